use crate::commands::one_shot::exit_code;

use decker_core::supervisor::OneShotOutcome;

use std::process::ExitCode;

/// **VALUE**: Verifies the tool's exit code follows decker's.
///
/// **WHY THIS MATTERS**: Scripts and CI check the exit code of `decker-server build`.
///
/// **BUG THIS CATCHES**: Would catch failures being reported as success.
#[test]
fn given_outcomes_when_mapping_exit_code_then_follows_decker() {
    assert_eq!(
        exit_code(&OneShotOutcome::Finished { code: Some(0) }),
        ExitCode::SUCCESS
    );
    assert_eq!(
        exit_code(&OneShotOutcome::Finished { code: Some(3) }),
        ExitCode::from(3)
    );
    assert_eq!(
        exit_code(&OneShotOutcome::Finished { code: Some(-1) }),
        ExitCode::FAILURE
    );
    assert_eq!(exit_code(&OneShotOutcome::NotInstalled), ExitCode::FAILURE);
}
