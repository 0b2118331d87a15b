//! End-to-end tests of the `sigcli` demo binary.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn sigcli() -> Command {
    cargo_bin_cmd!("sigcli")
}

mod cli_basics {
    use super::*;

    #[test]
    fn shows_help_with_command_listing() {
        sigcli()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("commands"))
            .stdout(predicate::str::contains("add"))
            .stdout(predicate::str::contains("greet"));
    }

    #[test]
    fn shows_version() {
        sigcli()
            .arg("--version")
            .assert()
            .success()
            .stdout(format!("sigcli {}\n", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn subcommand_help_lists_derived_flags() {
        sigcli()
            .args(["greet", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Greet NAME"))
            .stdout(predicate::str::contains("--greeting"))
            .stdout(predicate::str::contains("type: <int> (default: 1)"));
    }

    #[test]
    fn no_command_prints_nothing() {
        sigcli().assert().success().stdout("");
    }
}

mod dispatch {
    use super::*;

    #[test]
    fn add_with_default() {
        sigcli().args(["add", "1"]).assert().success().stdout("4\n");
        sigcli().args(["add", "1", "--b", "2"]).assert().success().stdout("3\n");
    }

    #[test]
    fn untyped_concat() {
        sigcli().args(["concat", "1", "2"]).assert().success().stdout("12\n");
    }

    #[test]
    fn repeated_flag() {
        sigcli()
            .args(["multi", "x", "--b", "1", "--b", "2"])
            .assert()
            .success()
            .stdout("[\n  \"1\",\n  \"2\"\n]\n");
    }

    #[test]
    fn switch_toggles_off() {
        sigcli().args(["close", "--switch"]).assert().success().stdout("false\n");
        sigcli().arg("close").assert().success().stdout("true\n");
    }

    #[test]
    fn keyword_only_flags() {
        sigcli()
            .args(["greet", "ada", "--shout", "--times", "2"])
            .assert()
            .success()
            .stdout("HELLO, ADA!\nHELLO, ADA!\n");
    }

    #[test]
    fn custom_port_type() {
        sigcli()
            .args(["serve", "--port", "9000"])
            .assert()
            .success()
            .stdout(predicate::str::contains("9000"))
            .stdout(predicate::str::contains("127.0.0.1"));
    }

    #[test]
    fn global_flags_are_accepted() {
        sigcli().args(["--quiet", "ping"]).assert().success().stdout("pong\n");
    }
}

mod usage_errors {
    use super::*;

    #[test]
    fn unknown_command() {
        sigcli()
            .arg("nope")
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("nope"));
    }

    #[test]
    fn missing_positional() {
        sigcli()
            .arg("add")
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("<a>"));
    }

    #[test]
    fn conversion_failure() {
        sigcli()
            .args(["add", "one"])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("invalid int value"));
    }

    #[test]
    fn bad_port() {
        sigcli()
            .args(["serve", "--port", "0"])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("invalid port value"));
    }
}
