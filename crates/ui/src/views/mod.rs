mod dashboard;
mod results;
mod state;
mod take_test;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use dashboard::DashboardView;
pub use results::ResultsView;
pub use state::{ViewError, ViewState};
pub use take_test::TakeTestView;
