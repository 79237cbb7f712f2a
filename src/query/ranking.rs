// src/query/ranking.rs
//
// Peer-group ranking without a stored rank column. Every rank is a correlated
// COUNT over the peer relation, evaluated by the store on each request:
//
//   rank(subject) = 1 + |{ peer in group(subject) : peer strictly precedes subject }|
//
// Ties share a rank (competition ranking). Nulls order last.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension};

use crate::errors::ServerError;

// Single source for the host threshold; `concat!` needs a literal.
macro_rules! min_host_listings {
    () => {
        2
    };
}

/// Hosts need at least this many listings in a neighborhood to be ranked there.
pub const MIN_HOST_LISTINGS: i64 = min_host_listings!();

/// Per (host, neighborhood) aggregates for hosts above the listing threshold.
pub const HOST_STATS_CTE: &str = concat!(
    "host_stats AS (
    SELECT
        id_host,
        neighborhood,
        COUNT(*) AS total_properties,
        AVG(rating) AS avg_rating,
        SUM(IFNULL(review_count, 0)) AS total_reviews,
        AVG(price) AS avg_price
    FROM listings
    GROUP BY id_host, neighborhood
    HAVING COUNT(*) >= ",
    min_host_listings!(),
    "
)"
);

/// Descending two-column ordering with nulls last.
///
/// Ratings and counts are never negative, so `IFNULL(x, -1)` sorts nulls
/// below every real value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderKey {
    pub primary: &'static str,
    pub tiebreak: &'static str,
}

pub const LISTING_ORDER: OrderKey = OrderKey {
    primary: "rating",
    tiebreak: "review_count",
};

pub const HOST_ORDER: OrderKey = OrderKey {
    primary: "avg_rating",
    tiebreak: "total_reviews",
};

impl OrderKey {
    fn col(alias: &str, column: &str) -> String {
        format!("IFNULL({alias}.{column}, -1)")
    }

    /// True when the `peer` row sorts strictly before the `subject` row.
    pub fn precedes(&self, peer: &str, subject: &str) -> String {
        let (p1, s1) = (Self::col(peer, self.primary), Self::col(subject, self.primary));
        let (p2, s2) = (Self::col(peer, self.tiebreak), Self::col(subject, self.tiebreak));
        format!("{p1} > {s1} OR ({p1} = {s1} AND {p2} > {s2})")
    }

    /// ORDER BY list for rows under `alias`, closed by `unique` so pages never overlap.
    pub fn order_by(&self, alias: &str, unique: &str) -> String {
        format!(
            "{} DESC, {} DESC, {alias}.{unique} ASC",
            Self::col(alias, self.primary),
            Self::col(alias, self.tiebreak)
        )
    }
}

/// The set of rows a subject is ranked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerGroup {
    /// Table or CTE holding the peers.
    pub relation: &'static str,
    /// CTE definition `relation` depends on, if any.
    pub with: Option<&'static str>,
    /// Columns a peer must share with the subject.
    pub shared: &'static [&'static str],
}

pub const SAME_NEIGHBORHOOD: PeerGroup = PeerGroup {
    relation: "listings",
    with: None,
    shared: &["neighborhood"],
};

pub const SAME_HOST: PeerGroup = PeerGroup {
    relation: "listings",
    with: None,
    shared: &["id_host"],
};

pub const HOSTS_IN_NEIGHBORHOOD: PeerGroup = PeerGroup {
    relation: "host_stats",
    with: Some(HOST_STATS_CTE),
    shared: &["neighborhood"],
};

/// Correlated scalar subquery giving the rank of the row aliased `subject`.
pub fn rank_expr(peers: &PeerGroup, key: &OrderKey, subject: &str) -> String {
    let membership: Vec<String> = peers
        .shared
        .iter()
        .map(|c| format!("peer.{c} = {subject}.{c}"))
        .collect();

    format!(
        "(SELECT COUNT(*) + 1 FROM {} AS peer WHERE {} AND ({}))",
        peers.relation,
        membership.join(" AND "),
        key.precedes("peer", subject)
    )
}

/// Rank of the single subject row matched by `subject_filter` (written against alias `s`).
/// `None` when no such row is in the peer relation.
pub fn rank_of(
    conn: &Connection,
    operation: &'static str,
    peers: &PeerGroup,
    key: &OrderKey,
    subject_filter: &str,
    params: &[Value],
) -> Result<Option<i64>, ServerError> {
    let with = peers.with.map(|cte| format!("WITH {cte} ")).unwrap_or_default();
    let sql = format!(
        "{with}SELECT {} FROM {} AS s WHERE {subject_filter}",
        rank_expr(peers, key, "s"),
        peers.relation
    );

    tracing::debug!(operation, params = params.len(), "rank lookup");
    conn.query_row(&sql, params_from_iter(params), |r| r.get::<_, i64>(0))
        .optional()
        .map_err(|e| ServerError::store(operation, e))
}
