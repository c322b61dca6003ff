// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod bikes;
pub mod expenses;
pub mod capital;
pub mod partners;
pub mod dashboard;
pub mod report;
pub mod exporter;
pub mod doctor;
