// Toxicity classification — trait-based abstraction over the hosted model.
//
// The ToxicityClassifier trait defines the interface. HuggingFaceClassifier
// implements it against the Hugging Face inference API; the web layer and
// the CLI only depend on the trait.

pub mod huggingface;
pub mod response;
pub mod retry;
pub mod traits;
