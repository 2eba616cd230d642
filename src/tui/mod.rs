// SPDX-FileCopyrightText: 2025 The tagtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod events;
pub mod layout;
pub mod tree;
pub mod view;
