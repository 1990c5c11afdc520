//! FAQ corpus adapters.

mod yaml_corpus;

pub use yaml_corpus::YamlFaqCorpus;
