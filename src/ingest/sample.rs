// src/ingest/sample.rs
//! Built-in demonstration corpus used when no file is uploaded.
//!
//! A handful of entries repeat on purpose: real feedback exports contain
//! duplicates and keyword matching must keep them.

const SAMPLE: &[&str] = &[
    "I really love this product! It's absolutely fantastic and exceeded my expectations.",
    "She is very kind and helpful. The customer service was exceptional throughout.",
    "This is just amazing, I am impressed with the quality and attention to detail.",
    "He was not happy with the service. The delivery was delayed without any notification.",
    "They are doing a great job with the new updates. The interface is much more user-friendly now.",
    "The movie was very boring and too long. I wouldn't recommend it to anyone.",
    "I think it could have been better with more features and better performance.",
    "We are going to the park tomorrow. The weather forecast looks perfect for outdoor activities.",
    "This phone is really fast and smooth. The battery life is impressive compared to previous models.",
    "It was an unnecessary delay in delivery. The communication could have been much better.",
    "Excellent service and quick response time. Highly recommended for anyone looking for quality.",
    "The product arrived damaged and the return process was complicated.",
    "Outstanding customer support! They went above and beyond to help me.",
    "Average experience, nothing special but also nothing terrible.",
    "The quality is exceptional and the price is very reasonable for what you get.",
    "The customer service was dreadful, and the staff were rude. I will not be returning.",
    "I was quite disappointed with the result. It didn't meet the standards promised.",
    "The app is easy to use, but the constant crashes are a major problem.",
    "A positive experience overall, but the shipping was slower than expected.",
    "This is a great tool for our team. The collaboration features are top-notch.",
    "The food was delicious, but the portion sizes were way too small for the price.",
    "The support team was quick to resolve my issue. Very satisfied.",
    "This product is a total game-changer. The innovation is truly remarkable.",
    "Not what I expected. The quality is subpar and the design is outdated.",
    "The new update is buggy and has made the system very difficult to navigate.",
    "The website is so easy to use. I found what I needed in seconds.",
    "The delivery was incredibly fast and the packaging was excellent. Highly satisfied.",
    "I experienced some bugs after the latest update. It has become quite unstable.",
    "The staff were polite and resolved my issue quickly. Great experience.",
    "Poor quality material and the color was not as advertised. Very disappointing.",
    "This is my favorite app. The user interface is intuitive and efficient.",
    "The price is a bit high for what you get, but the performance is unmatched.",
    "I had a terrible experience with customer support. They were not helpful at all.",
    "The product is fine, but the shipping cost was exorbitant. I won't order again.",
    "They are very responsive to feedback and keep improving the product.",
    "The design is sleek and modern. It looks fantastic on my desk.",
    "The service was slow, and the food was cold. Definitely not a good experience.",
    "I am so impressed with the quality and durability. This product will last for years.",
    "The installation was a nightmare. The instructions were confusing and incomplete.",
    "This is a brilliant solution to a common problem. I wish I had found it sooner.",
    "I'm disappointed with the battery life. It drains much faster than expected.",
    "The new features are great, but the overall speed has decreased significantly.",
    "Customer service was rude and unhelpful. They didn't listen to my problem.",
    "The product arrived late and there was no tracking information available.",
    "I was expecting more for the price. It's an okay product, but nothing special.",
    "Excellent value for money. The features are top-tier for this price range.",
    "The company is very transparent and communicates clearly with their customers.",
    "The performance is not as good as promised. I've had many issues with it.",
    "This is a wonderful addition to my collection. The craftsmanship is beautiful.",
    "I'm so frustrated with the constant glitches. It's a waste of my time.",
    "The product is outstanding! I have no complaints at all.",
    "The delivery was incredibly fast and the packaging was excellent. Highly satisfied.",
    "This is a great tool for our team. The collaboration features are top-notch.",
    "The support team was quick to resolve my issue. Very satisfied.",
    "Outstanding customer support! They went above and beyond to help me.",
    "The food was delicious, but the portion sizes were way too small for the price.",
    "The new update is buggy and has made the system very difficult to navigate.",
    "The installation was a nightmare. The instructions were confusing and incomplete.",
    "The website is so easy to use. I found what I needed in seconds.",
    "Poor quality material and the color was not as advertised. Very disappointing.",
    "The performance is not as good as promised. I've had many issues with it.",
    "I am so impressed with the quality and durability. This product will last for years.",
    "This product is a total game-changer. The innovation is truly remarkable.",
    "The company is very transparent and communicates clearly with their customers.",
];

/// The sample corpus as owned comments, in fixed order.
pub fn sample_comments() -> Vec<String> {
    SAMPLE.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::{FrequencyTable, StopwordSet};
    use crate::sentiment::{SentimentAnalyzer, SentimentLabel};

    #[test]
    fn corpus_is_stable_and_non_empty() {
        let c = sample_comments();
        assert_eq!(c.len(), 64);
        assert!(c.iter().all(|s| !s.trim().is_empty()));
    }

    #[test]
    fn corpus_has_every_sentiment() {
        let a = SentimentAnalyzer::new();
        let labels: Vec<SentimentLabel> = sample_comments()
            .iter()
            .map(|c| a.classify(c).label)
            .collect();
        assert!(labels.contains(&SentimentLabel::Positive));
        assert!(labels.contains(&SentimentLabel::Negative));
        assert!(labels.contains(&SentimentLabel::Neutral));
    }

    #[test]
    fn product_and_quality_are_frequent_keywords() {
        let t = FrequencyTable::from_comments(&sample_comments(), StopwordSet::english());
        let top: Vec<&str> = t.top(10).iter().map(|e| e.word.as_str()).collect();
        assert!(top.contains(&"product"), "{top:?}");
        assert!(top.contains(&"quality"), "{top:?}");
    }
}
