// toxic-relay: HTTP relay for hosted toxicity classification
//
// This is the library root. `toxicity` holds the provider adapter and its
// types, `web` the JSON API around it.

pub mod config;
pub mod output;
pub mod toxicity;
pub mod web;
