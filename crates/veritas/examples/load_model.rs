//! Loads a model from disk, unpacking `models/model.zip` if needed.
//!
//! Run with: cargo run --example load_model -- models "Some article text"

use std::sync::Arc;

use veritas::prelude::*;
use veritas::ModelPaths;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let dir = args.next().unwrap_or_else(|| "models".into());
    let text = args.collect::<Vec<_>>().join(" ");

    let paths = ModelPaths { dir: dir.into(), ..ModelPaths::default() };
    let source = ModelSource::new(paths.extracted_path(), paths.archive_path());

    let pipeline = source.load()?;
    println!("Loaded {:?}", pipeline);

    let prediction = Predictor::new(Arc::new(pipeline)).predict(&text)?;
    println!("{} (confidence {:.4})", prediction.label, prediction.confidence);
    if let Some(note) = prediction.note {
        println!("note: {}", note);
    }

    Ok(())
}
