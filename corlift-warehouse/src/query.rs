//! Warehouse Query Templates
//!
//! Parameterized SQL against the unified experiment tables: a date-boundary
//! lookup, a per-variant aggregate summary, and per-receipt financial detail.
//! Templates are plain strings; the caller runs them through whatever
//! `QueryClient` backend it owns. String parameters are quote-escaped before
//! interpolation.
//!
//! Receipts are attributed to a bucketed unit through one of three identifier
//! joins (browser, buyer user, seller user) depending on how the experiment
//! bucketed its population; the three branches share one template.

const EXPERIMENT_BOUNDARIES: &str = "`etsy-data-warehouse-prod.catapult_unified.experiment`";
const CATAPULT_LAUNCHES: &str = "`etsy-data-warehouse-prod.etsy_atlas.catapult_launches`";
const BUCKETING_PERIODS: &str = "`etsy-data-warehouse-prod.catapult_unified.bucketing_period`";
const VISITS_TRANSACTIONS: &str = "`etsy-data-warehouse-prod.visit_mart.visits_transactions`";
const ALL_RECEIPTS: &str = "`etsy-data-warehouse-prod.transaction_mart.all_receipts`";
const RECEIPTS_GMS: &str = "`etsy-data-warehouse-prod.transaction_mart.receipts_gms`";
const ALL_TRANSACTIONS: &str = "`etsy-data-warehouse-prod.transaction_mart.all_transactions`";
const COUNTRIES: &str = "`etsy-data-warehouse-prod.etsy_v2.countries`";
const USER_CASES: &str = "`etsy-data-warehouse-prod.rollups.user_cases`";
const GIFT_RECEIPT_OPTIONS: &str = "`etsy-data-warehouse-prod.etsy_shard.gift_receipt_options`";
const COR_MAIN: &str = "`etsy-data-warehouse-prod.rollups.cor_main`";

/// Double embedded single quotes so a value is safe inside a SQL literal.
fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// `DECLARE`/`SET` header binding the experiment id once for the whole script.
fn declare_experiment(experiment_id: &str) -> String {
    format!(
        "DECLARE experiment_name STRING;\nSET experiment_name = '{}';",
        escape_literal(experiment_id)
    )
}

/// Latest bucketing boundary per experiment, deduplicated to the most recent
/// boundary start.
fn boundary_ctes() -> String {
    format!(
        "max_values_cte AS (
  SELECT
    experiment_id,
    boundary_start_ts,
    MAX(_date) AS end_date,
    is_filtered,
    ROW_NUMBER() OVER (PARTITION BY experiment_id ORDER BY boundary_start_ts DESC) AS row_num
  FROM {EXPERIMENT_BOUNDARIES}
  WHERE experiment_id = experiment_name
  GROUP BY 1, 2, 4
),

boundary AS (
  SELECT
    a.experiment_id,
    b.name,
    a.boundary_start_ts,
    DATE(a.boundary_start_ts) AS start_date,
    a.end_date,
    a.is_filtered
  FROM max_values_cte a
  JOIN {CATAPULT_LAUNCHES} b
    ON a.experiment_id = b.config_flag
  WHERE a.row_num = 1
  GROUP BY 1, 2, 3, 4, 5, 6
)"
    )
}

/// One branch of the receipt-attribution union: receipts joined to the
/// bucketed population through the given identifier predicate.
fn attribution_branch(join_predicate: &str, extra_filters: &str) -> String {
    format!(
        "  (SELECT
    a.experiment_id,
    a.name,
    a.bucketing_id,
    a.bucketing_id_type,
    a.variant_id,
    a.bucketing_date,
    DATE(b.creation_tsz) AS receipt_date,
    b.receipt_id
  FROM bucketing_exp a
  LEFT JOIN (
    SELECT
      vt._date,
      vt.purch_date,
      SPLIT(vt.visit_id, '.')[ORDINAL(1)] AS browser_id,
      vt.user_id,
      vt.seller_user_id,
      vt.receipt_id,
      ar.creation_tsz
    FROM {VISITS_TRANSACTIONS} vt
    LEFT JOIN {ALL_RECEIPTS} ar
      ON vt.receipt_id = ar.receipt_id
  ) b
    ON {join_predicate}
    AND b.creation_tsz BETWEEN a.bucketing_time AND a.end_time
  WHERE experiment_id = experiment_name
    {extra_filters}
    AND a.bucketing_time IS NOT NULL)"
    )
}

/// CTE attributing every receipt in the experiment window to the variant of
/// the unit that produced it, deduplicated to the earliest receipt date.
fn experiment_receipts_cte() -> String {
    let browser_branch = attribution_branch(
        "a.bucketing_id = b.browser_id",
        "AND a.bucketing_id_type = 1",
    );
    let buyer_branch = attribution_branch(
        "CAST(a.bucketing_id AS INT64) = b.user_id",
        "AND a.bucketing_id_type = 2\n    AND a.buyer_focused = 1",
    );
    let seller_branch = attribution_branch(
        "CAST(a.bucketing_id AS INT64) = b.seller_user_id",
        "AND a.bucketing_id_type = 2\n    AND a.buyer_focused = 0",
    );

    format!(
        "catapult_experiment_receipts AS (
WITH {boundary},

bucketing_exp AS (
  SELECT
    e.experiment_id,
    b.name,
    CASE WHEN e.experiment_id LIKE '%_sf' OR b.name LIKE '%[Seller-Facing]%' THEN 0 ELSE 1 END AS buyer_focused,
    e.boundary_start_ts,
    CASE WHEN b.is_filtered = TRUE THEN e.filtered_bucketing_ts ELSE e.bucketing_ts END AS bucketing_time,
    CASE WHEN b.is_filtered = TRUE THEN DATE(e.filtered_bucketing_ts) ELSE DATE(e.bucketing_ts) END AS bucketing_date,
    b.is_filtered,
    e.bucketing_ts,
    e.filtered_bucketing_ts,
    e.bucketing_id,
    e.variant_id,
    e.bucketing_id_type,
    b.end_date,
    TIMESTAMP_ADD(TIMESTAMP(b.end_date), INTERVAL 1439 MINUTE) AS end_time
  FROM {BUCKETING_PERIODS} e
  JOIN boundary b USING (experiment_id, boundary_start_ts)
  WHERE experiment_id = experiment_name
),

tab AS (
{browser_branch}
  UNION ALL
{buyer_branch}
  UNION ALL
{seller_branch}
)

SELECT
  experiment_id,
  name,
  bucketing_id,
  bucketing_id_type,
  variant_id,
  bucketing_date,
  receipt_id,
  MIN(receipt_date) AS receipt_date
FROM tab
GROUP BY 1, 2, 3, 4, 5, 6, 7
)",
        boundary = boundary_ctes(),
    )
}

/// CTE enriching each receipt with GMS, buyer country, open cases, and gift
/// markers.
fn all_receipts_cte() -> String {
    format!(
        "all_receipts AS (
WITH receipts_marked_as_gift AS (
  SELECT
    receipt_id,
    MAX(is_gift) AS marked_as_gift
  FROM {ALL_TRANSACTIONS}
  WHERE receipt_id IS NOT NULL
  GROUP BY 1
)
SELECT
  a.*,
  c.name AS buyer_country_name,
  b.gms_gross,
  b.gms_net,
  b.seller_country_name,
  b.is_gift_card,
  d.user_case_id,
  CASE WHEN d.user_case_id IS NOT NULL THEN 1 ELSE 0 END AS has_case,
  d.type,
  TIMESTAMP_SECONDS(d.case_date) AS case_date,
  CASE WHEN e.receipt_id IS NOT NULL THEN 1 ELSE 0 END AS has_gift_teaser,
  marked_as_gift
FROM {ALL_RECEIPTS} a
JOIN {RECEIPTS_GMS} b ON a.receipt_id = b.receipt_id
LEFT JOIN {COUNTRIES} c ON a.country_id = c.country_id
LEFT JOIN {USER_CASES} d ON a.receipt_id = d.receipt_id
LEFT JOIN {GIFT_RECEIPT_OPTIONS} e ON a.receipt_id = e.receipt_id
LEFT JOIN receipts_marked_as_gift f ON a.receipt_id = f.receipt_id
)"
    )
}

/// Per-receipt chargeback and bad-recoupment totals. A receipt with no
/// activity in a stream sums to NULL, not zero.
fn cor_by_receipt_subquery() -> String {
    format!(
        "(SELECT
    receipt_id,
    SUM(CASE WHEN cor_stream IN ('bad_recoupment') THEN amount_usd ELSE NULL END) AS bad_recoupments,
    SUM(CASE WHEN cor_stream IN ('chargeback', 'chargeback_fee') THEN amount_usd ELSE NULL END) AS chargebacks
  FROM {COR_MAIN}
  GROUP BY 1)"
    )
}

/// Experiment metadata and date-boundary lookup: id, launch name, start and
/// end date, and whether bucketing was filtered.
pub fn experiment_summary_sql(experiment_id: &str) -> String {
    format!(
        "{declare}

WITH {boundary}

SELECT
  experiment_id,
  name,
  start_date,
  end_date,
  is_filtered
FROM boundary",
        declare = declare_experiment(experiment_id),
        boundary = boundary_ctes(),
    )
}

/// Per-variant aggregate summary: bucketed-unit counts and gross GMS over the
/// experiment's attributed receipts.
pub fn variant_stats_sql(experiment_id: &str) -> String {
    format!(
        "{declare}

WITH {receipts},

{enriched}

SELECT
  catapult_experiment_receipts.experiment_id,
  catapult_experiment_receipts.variant_id AS variant,
  COUNT(DISTINCT catapult_experiment_receipts.bucketing_id) AS bucketed_users,
  SUM(COALESCE(CAST(all_receipts.gms_gross AS FLOAT64), 0)) AS gms
FROM catapult_experiment_receipts
LEFT JOIN all_receipts
  ON catapult_experiment_receipts.receipt_id = all_receipts.receipt_id
WHERE catapult_experiment_receipts.experiment_id = experiment_name
GROUP BY 1, 2",
        declare = declare_experiment(experiment_id),
        receipts = experiment_receipts_cte(),
        enriched = all_receipts_cte(),
    )
}

/// Per-receipt variant and financial detail, restricted to the two variants
/// of interest. GMS zero-fills receipts that never matched the enrichment
/// join; chargeback and recoupment amounts zero-fill receipts with no
/// cost-of-revenue activity.
pub fn experiment_receipts_sql(experiment_id: &str, control: &str, treatment: &str) -> String {
    format!(
        "{declare}

WITH {receipts},

{enriched}

SELECT
  catapult_experiment_receipts.variant_id AS variant,
  catapult_experiment_receipts.receipt_id,
  COALESCE(CAST(all_receipts.gms_gross AS FLOAT64), 0) AS gms_gross,
  COALESCE(CAST(all_receipts.gms_net AS FLOAT64), 0) AS gms_net,
  COALESCE(cor.bad_recoupments, 0) AS bad_recoupments,
  COALESCE(cor.chargebacks, 0) AS chargebacks,
  COALESCE(cor.bad_recoupments, 0) + COALESCE(cor.chargebacks, 0) AS total_cor
FROM catapult_experiment_receipts
LEFT JOIN all_receipts
  ON catapult_experiment_receipts.receipt_id = all_receipts.receipt_id
LEFT JOIN {cor} cor
  ON catapult_experiment_receipts.receipt_id = cor.receipt_id
WHERE catapult_experiment_receipts.experiment_id = experiment_name
  AND catapult_experiment_receipts.receipt_id IS NOT NULL
  AND catapult_experiment_receipts.variant_id IN ('{control}', '{treatment}')",
        declare = declare_experiment(experiment_id),
        receipts = experiment_receipts_cte(),
        enriched = all_receipts_cte(),
        cor = cor_by_receipt_subquery(),
        control = escape_literal(control),
        treatment = escape_literal(treatment),
    )
}
