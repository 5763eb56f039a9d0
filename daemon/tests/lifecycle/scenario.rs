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
use x8h7rstd::lifecycle::LifecycleState;
use x8h7rstd::lines::Level;
use x8h7rstd::targets::portenta_x8h7::BOOT_SELECT_LINE_NAME;

#[gtest]
#[tokio::test]
async fn attach_use_detach_reattach() {
    let mut f = fixture();

    f.lifecycle.attach().await.unwrap();
    expect_that!(f.publisher.read(ATTRIBUTE), ok(eq("1\n")));

    expect_that!(f.publisher.write(ATTRIBUTE, "0"), ok(eq(&1)));
    expect_that!(levels(&f.provider), eq((0, 1)));
    expect_that!(f.publisher.read(ATTRIBUTE), ok(eq("0\n")));

    expect_that!(f.publisher.write(ATTRIBUTE, "1\n"), ok(eq(&2)));
    expect_that!(f.publisher.read(ATTRIBUTE), ok(eq("1\n")));

    expect_that!(
        f.publisher.write(ATTRIBUTE, "2"),
        err(displays_as(starts_with("X8h7Error::InvalidCommand")))
    );
    expect_that!(f.publisher.read(ATTRIBUTE), ok(eq("1\n")));

    f.provider.force_level(BOOT_SELECT_LINE_NAME, Level::High);
    expect_that!(f.publisher.read(ATTRIBUTE), ok(eq("2\n")));
    f.publisher.write(ATTRIBUTE, "0").unwrap();
    expect_that!(f.publisher.read(ATTRIBUTE), ok(eq("0\n")));

    f.lifecycle.detach().await.unwrap();
    expect_that!(levels(&f.provider), eq((0, 1)));
    expect_that!(nothing_held(&f.provider), eq(true));
    expect_that!(
        f.publisher.read(ATTRIBUTE),
        err(displays_as(contains_substring("no such attribute")))
    );

    f.lifecycle.attach().await.unwrap();
    expect_that!(f.lifecycle.state(), eq(LifecycleState::Attached));
    expect_that!(f.publisher.read(ATTRIBUTE), ok(eq("1\n")));
}
