//! Rule resolution: merges layered rules into per-variant test plans.

pub mod model;
pub mod resolve;

pub use model::{PlanId, TestPlan};
pub use resolve::{PlanBuilder, plans_for, resolve};
