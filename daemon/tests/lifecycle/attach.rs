// This file is part of x8h7rstd, an application to manage the reset and boot-mode lines of the Portenta X8 H7 coprocessor.
//
// Copyright 2025 Canonical Ltd.
//
// SPDX-License-Identifier: GPL-3.0-only
//
// x8h7rstd is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License version 3, as published by the Free Software Foundation.
//
// x8h7rstd is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranties of MERCHANTABILITY, SATISFACTORY QUALITY, or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with this program.  If not, see http://www.gnu.org/licenses/.

use crate::common::reset_fixtures::*;
use googletest::prelude::*;
use rstest::*;
use std::time::Duration;
use x8h7rstd::error::{EBUSY, EIO};
use x8h7rstd::lifecycle::LifecycleState;
use x8h7rstd::lines::Level;
use x8h7rstd::targets::portenta_x8h7::{BOOT_SELECT_LINE_NAME, RESET_LINE_NAME};

#[gtest]
#[tokio::test]
async fn attach_sequences_before_publishing() {
    let mut f = fixture();
    f.lifecycle.attach().await.unwrap();

    let journal = f.provider.journal();
    let writes: Vec<(&str, Level)> = journal
        .iter()
        .map(|event| (event.line.as_str(), event.level))
        .collect();
    assert_eq!(
        writes,
        vec![
            (RESET_LINE_NAME, Level::Low),
            (BOOT_SELECT_LINE_NAME, Level::High),
            (RESET_LINE_NAME, Level::High),
            (BOOT_SELECT_LINE_NAME, Level::Low),
        ]
    );
    let held_for = journal[2].at.duration_since(journal[1].at);
    expect_that!(held_for, ge(Duration::from_millis(50)));

    expect_that!(f.lifecycle.state(), eq(LifecycleState::Attached));
    expect_that!(f.publisher.is_published(ATTRIBUTE), eq(true));
    expect_that!(f.publisher.read(ATTRIBUTE), ok(eq("1\n")));
    expect_that!(levels(&f.provider), eq((1, 0)));
}

#[rstest]
#[case::reset_busy(RESET_LINE_NAME, EBUSY)]
#[case::reset_io(RESET_LINE_NAME, EIO)]
#[case::boot_select_busy(BOOT_SELECT_LINE_NAME, EBUSY)]
#[case::boot_select_io(BOOT_SELECT_LINE_NAME, EIO)]
#[tokio::test]
async fn failed_acquisition_leaves_nothing_behind(#[case] line: &str, #[case] code: i32) {
    let mut f = fixture();
    f.provider.fail_acquire(line, code);

    let err = f.lifecycle.attach().await.map(|_| ()).unwrap_err();
    assert_that!(err.os_code(), some(eq(code)));
    assert_that!(
        err.to_string(),
        contains_substring(format!("Failed to acquire {line}"))
    );
    assert_that!(f.lifecycle.state(), eq(LifecycleState::Unattached));
    assert_that!(f.publisher.is_published(ATTRIBUTE), eq(false));
    assert_that!(nothing_held(&f.provider), eq(true));
    assert_that!(f.provider.journal().len(), eq(0));
}

#[gtest]
#[tokio::test]
async fn attach_retries_cleanly_after_second_line_failed() {
    let mut f = fixture();
    f.provider.fail_acquire(BOOT_SELECT_LINE_NAME, EBUSY);
    expect_that!(
        f.lifecycle.attach().await.map(|_| ()),
        err(displays_as(contains_substring("error code 16")))
    );

    f.provider.clear_failure(BOOT_SELECT_LINE_NAME);
    f.lifecycle.attach().await.unwrap();
    expect_that!(f.lifecycle.state(), eq(LifecycleState::Attached));
    expect_that!(f.publisher.read(ATTRIBUTE), ok(eq("1\n")));
}

#[gtest]
#[tokio::test]
async fn failed_publish_tears_down() {
    let mut f = fixture();
    f.publisher.fail_publish(true);

    expect_that!(
        f.lifecycle.attach().await.map(|_| ()),
        err(displays_as(contains_substring("cannot publish x8h7_reset")))
    );
    expect_that!(f.lifecycle.state(), eq(LifecycleState::Unattached));
    expect_that!(f.lifecycle.controller().is_none(), eq(true));
    expect_that!(nothing_held(&f.provider), eq(true));
    // the device is left held in reset
    expect_that!(levels(&f.provider), eq((0, 1)));

    f.publisher.fail_publish(false);
    f.lifecycle.attach().await.unwrap();
    expect_that!(f.publisher.read(ATTRIBUTE), ok(eq("1\n")));
}

#[gtest]
#[tokio::test]
async fn second_attach_is_refused() {
    let mut f = fixture();
    f.lifecycle.attach().await.unwrap();
    let writes = f.provider.journal().len();

    expect_that!(
        f.lifecycle.attach().await.map(|_| ()),
        err(displays_as(starts_with("X8h7Error::Lifecycle")))
    );
    expect_that!(f.provider.journal().len(), eq(writes));
    expect_that!(f.publisher.read(ATTRIBUTE), ok(eq("1\n")));
}
