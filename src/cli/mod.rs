//! Command workflow shared by the binary and integration tests

pub mod orchestration;

pub use orchestration::{
    apply_release, exit_code, last_released, plan_release, AppliedRelease, ReleaseArgs,
    ReleasePlan, EXIT_FAILURE, EXIT_NO_RELEASE, EXIT_SUCCESS,
};
