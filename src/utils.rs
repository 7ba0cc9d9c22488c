pub mod lbfgs;
pub use lbfgs::{minimize, LbfgsConfig, LbfgsOutcome, LbfgsStatus};

pub mod log_sum_exp;
pub use log_sum_exp::log_sum_exp;

pub mod sort_results;
pub use sort_results::sort_results;

pub mod tokenize;
pub use tokenize::tokenize;
