pub mod cli;
pub mod run;
pub mod run_batch;
pub mod run_filter_outputs;
pub mod run_single_site;
