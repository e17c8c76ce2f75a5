// SPDX-License-Identifier: Apache-2.0

use crate::errors::ApiError;
use std::collections::BTreeMap;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;
pub const DEFAULT_DAYS_BACK: u32 = 30;
pub const MAX_LIMIT: u32 = 100;
pub const MAX_DAYS_BACK: u32 = 365;

/// Deployment-tunable validation bounds. Defaults mirror the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamBounds {
    pub default_limit: u32,
    pub max_limit: u32,
    pub default_days_back: u32,
    pub max_days_back: u32,
}

impl Default for ParamBounds {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
            default_days_back: DEFAULT_DAYS_BACK,
            max_days_back: MAX_DAYS_BACK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListNewEntriesParams {
    pub page: u32,
    pub limit: u32,
    pub days_back: u32,
}

pub fn parse_list_new_entries_params(
    query: &BTreeMap<String, String>,
) -> Result<ListNewEntriesParams, ApiError> {
    parse_list_new_entries_params_with_bounds(query, ParamBounds::default())
}

pub fn parse_list_new_entries_params_with_bounds(
    query: &BTreeMap<String, String>,
    bounds: ParamBounds,
) -> Result<ListNewEntriesParams, ApiError> {
    // Deployment bounds are untrusted config; clamp them into the valid
    // range so a bad default can never bypass the checks applied to
    // request-supplied values.
    let max_limit = bounds.max_limit.max(1);
    let max_days_back = bounds.max_days_back.max(1);
    let page = parse_bounded(query, "page", DEFAULT_PAGE, 1, u32::MAX)?;
    let limit = parse_bounded(
        query,
        "limit",
        bounds.default_limit.clamp(1, max_limit),
        1,
        max_limit,
    )?;
    let days_back = parse_bounded(
        query,
        "days_back",
        bounds.default_days_back.clamp(1, max_days_back),
        1,
        max_days_back,
    )?;
    Ok(ListNewEntriesParams {
        page,
        limit,
        days_back,
    })
}

fn parse_bounded(
    query: &BTreeMap<String, String>,
    name: &str,
    default: u32,
    min: u32,
    max: u32,
) -> Result<u32, ApiError> {
    let Some(raw) = query.get(name) else {
        return Ok(default);
    };
    let value = raw
        .parse::<u32>()
        .map_err(|_| ApiError::invalid_param(name, raw, "must be an integer"))?;
    if value < min {
        return Err(ApiError::invalid_param(
            name,
            raw,
            &format!("must be >= {min}"),
        ));
    }
    if value > max {
        return Err(ApiError::invalid_param(
            name,
            raw,
            &format!("must be <= {max}"),
        ));
    }
    Ok(value)
}
