//! Classifies a headline with a small hand-written model.
//!
//! Run with: cargo run --example classify -- "Senate approves budget report"

use std::sync::Arc;

use veritas::prelude::*;

const MODEL: &str = r#"{
    "format_version": 1,
    "name": "demo",
    "vectorizer": {
        "kind": "tfidf",
        "vocabulary": {
            "senate": 0, "budget": 1, "report": 2, "official": 3,
            "shocking": 4, "miracle": 5, "secret": 6, "hoax": 7
        },
        "idf": [1.4, 1.2, 1.1, 1.3, 1.8, 2.0, 1.7, 2.2]
    },
    "classifier": {
        "kind": "logistic_regression",
        "classes": [0, 1],
        "coef": [[2.1, 1.8, 1.5, 1.9, -2.4, -2.8, -2.0, -3.1]],
        "intercept": [0.1]
    }
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let text = std::env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");

    // Build the pipeline from the embedded artifact
    let pipeline = Pipeline::from_artifact(ModelArtifact::from_json(MODEL)?)?;
    let predictor = Predictor::new(Arc::new(pipeline));

    let prediction = predictor.predict(&text)?;
    println!("{}", serde_json::to_string_pretty(&prediction)?);

    Ok(())
}
