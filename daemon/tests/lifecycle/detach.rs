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
use x8h7rstd::lifecycle::LifecycleState;

#[rstest]
#[case::from_running("1")]
#[case::from_held_in_reset("0")]
#[tokio::test]
async fn detach_leaves_device_held_in_reset(#[case] last_write: &str) {
    let mut f = fixture();
    f.lifecycle.attach().await.unwrap();
    f.publisher.write(ATTRIBUTE, last_write).unwrap();

    f.lifecycle.detach().await.unwrap();

    assert_that!(f.lifecycle.state(), eq(LifecycleState::Unattached));
    assert_that!(f.publisher.is_published(ATTRIBUTE), eq(false));
    assert_that!(levels(&f.provider), eq((0, 1)));
    assert_that!(nothing_held(&f.provider), eq(true));
}

#[gtest]
#[tokio::test]
async fn controller_kept_past_detach_is_not_ready() {
    let mut f = fixture();
    let controller = f.lifecycle.attach().await.unwrap();
    f.lifecycle.detach().await.unwrap();

    expect_that!(
        controller.show(),
        err(displays_as(starts_with("X8h7Error::NotReady")))
    );
    expect_that!(
        controller.store("1"),
        err(displays_as(starts_with("X8h7Error::NotReady")))
    );
    expect_that!(levels(&f.provider), eq((0, 1)));
}

#[gtest]
#[tokio::test]
async fn detach_releases_lines_even_if_unpublish_fails() {
    let mut f = fixture();
    f.lifecycle.attach().await.unwrap();
    f.publisher.fail_unpublish(true);

    expect_that!(
        f.lifecycle.detach().await,
        err(displays_as(contains_substring("cannot unpublish x8h7_reset")))
    );
    expect_that!(f.lifecycle.state(), eq(LifecycleState::Unattached));
    expect_that!(levels(&f.provider), eq((0, 1)));
    expect_that!(nothing_held(&f.provider), eq(true));
}

#[gtest]
#[tokio::test]
async fn detach_twice_is_refused() {
    let mut f = fixture();
    f.lifecycle.attach().await.unwrap();
    f.lifecycle.detach().await.unwrap();
    expect_that!(
        f.lifecycle.detach().await,
        err(displays_as(starts_with("X8h7Error::Lifecycle")))
    );
}
