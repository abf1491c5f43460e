pub mod classifier;
pub mod harvester;
pub mod traversal;

#[cfg(test)]
pub mod testing;

pub use classifier::SiteClassifier;
pub use harvester::ContactHarvester;
