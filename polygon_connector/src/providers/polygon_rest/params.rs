use std::fmt;
use std::str::FromStr;

/// Specifies the sort order for the bars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Sort {
    #[default]
    Asc,
    Desc,
}

impl Sort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sort::Asc => "asc",
            Sort::Desc => "desc",
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Sort::Asc),
            "desc" => Ok(Sort::Desc),
            other => Err(format!("Invalid sort order: {other} (expected asc or desc)")),
        }
    }
}

/// Optional query parameters of the aggregates endpoint.
///
/// Unset fields are left off the query string, so the API defaults apply.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolygonAggsParams {
    /// Whether results are adjusted for splits.
    pub adjusted: Option<bool>,
    pub sort: Option<Sort>,
    /// Base aggregates per page.
    pub limit: Option<u32>,
}

impl PolygonAggsParams {
    pub fn construct_params(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(adjusted) = self.adjusted {
            query.push(("adjusted", adjusted.to_string()));
        }
        if let Some(sort) = self.sort {
            query.push(("sort", sort.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}
