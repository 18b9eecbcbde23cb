mod results_vm;
mod take_test_vm;
mod time_fmt;

pub use results_vm::{CompletedTest, ResultsVm, map_results};
pub use take_test_vm::{
    BannerTone, BannerVm, ConfirmVm, NavCellVm, OptionVm, QuestionVm, TakeTestVm,
    banner_for_notice, leave_flash, load_failure_flash, take_test_state,
};
pub use time_fmt::{format_remaining, format_saved_at};
