use serde::Deserialize;

/// Columns the list view may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Company,
    JobTitle,
    Status,
    #[default]
    DateApplied,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Company,
        SortKey::JobTitle,
        SortKey::Status,
        SortKey::DateApplied,
    ];

    /// Exact, case-sensitive match against the column name.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.column() == raw)
    }

    /// Column name; safe to splice into SQL because it comes from this fixed set.
    pub fn column(self) -> &'static str {
        match self {
            SortKey::Company => "company",
            SortKey::JobTitle => "job_title",
            SortKey::Status => "status",
            SortKey::DateApplied => "date_applied",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Case-insensitive: `asc`, `Asc` and `ASC` are all accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("asc") {
            Some(SortOrder::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(SortOrder::Desc)
        } else {
            None
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Raw query string of `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// List request after whitelisting. Unknown sort values fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListQuery {
    pub status: Option<String>,
    pub sort_key: SortKey,
    pub order: SortOrder,
}

impl From<ListParams> for ListQuery {
    fn from(params: ListParams) -> Self {
        ListQuery {
            status: params.status.filter(|s| !s.is_empty()),
            sort_key: params
                .sort_by
                .as_deref()
                .and_then(SortKey::parse)
                .unwrap_or_default(),
            order: params
                .order
                .as_deref()
                .and_then(SortOrder::parse)
                .unwrap_or_default(),
        }
    }
}
