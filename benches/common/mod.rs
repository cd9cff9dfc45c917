// ABOUTME: Common benchmark utilities and pose frame fixtures for performance testing
// ABOUTME: Provides reusable frame sequence generators for Criterion benchmarks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Common benchmark utilities and frame fixtures.

pub mod fixtures;
