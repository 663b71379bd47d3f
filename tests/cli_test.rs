mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::ops_file;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() {
    let file = ops_file(&[
        "open, alice, , , 123456,",
        "open, bob, , , 222333,",
        "deposit, alice, , 100, 123456,",
        "withdraw, alice, , 30, 123456,",
        "transfer, alice, bob, 50, 123456,",
        "change-pin, bob, , , 222333, 999888",
        "deposit, bob, , 25, 999888,",
    ]);

    let mut cmd = Command::new(cargo_bin!("pocketbank"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "account,owner,balance,transactions",
        ))
        // Alice: deposit, withdraw, transfer out.
        .stdout(predicate::str::contains(",alice,20,3"))
        // Bob: transfer in, deposit under the new PIN.
        .stdout(predicate::str::contains(",bob,75,2"));
}

#[test]
fn test_bad_rows_are_reported_and_skipped() {
    let file = ops_file(&[
        "open, alice, , , 123456,",
        "explode, alice, , , ,",
        "deposit, alice, , ten, 123456,",
        "deposit, alice, , 100, 123456,",
        "withdraw, alice, , 5000, 123456,",
        "deposit, alice, , 10, ,",
        "deposit, carol, , 10, 123456,",
        "withdraw, alice, , 30, 123456,",
    ]);

    let mut cmd = Command::new(cargo_bin!("pocketbank"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading operation"))
        .stderr(predicate::str::contains("insufficient balance"))
        .stderr(predicate::str::contains("missing required column"))
        .stderr(predicate::str::contains("no account opened"))
        .stdout(predicate::str::contains(",alice,70,2"));
}

#[test]
fn test_closed_accounts_leave_the_report() {
    let file = ops_file(&[
        "open, alice, , , 123456,",
        "open, bob, , , 222333,",
        "deposit, alice, , 40, 123456,",
        "close, bob, , , ,",
    ]);

    let mut cmd = Command::new(cargo_bin!("pocketbank"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(",alice,40,1"))
        .stdout(predicate::str::contains(",bob,").not());
}

#[test]
fn test_wrong_pin_is_rejected_per_row() {
    let file = ops_file(&[
        "open, alice, , , 123456,",
        "deposit, alice, , 100, 123456,",
        "withdraw, alice, , 10, 111111,",
    ]);

    let mut cmd = Command::new(cargo_bin!("pocketbank"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("pin verification failed"))
        .stdout(predicate::str::contains(",alice,100,1"));
}
