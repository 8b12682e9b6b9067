//! # Part Repository
//!
//! Database operations for catalog parts.
//!
//! ## Two Read Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Configurator (customers)            Admin dashboard                   │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  get_all() -> Vec<Part>              list_all() -> DbResult<Vec<Part>> │
//! │  errors logged, empty catalog        errors reported to the admin      │
//! │                                                                         │
//! │  Both sorted by part number ascending.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, error, info, warn};

use crate::error::{DbError, DbResult};
use bellows_core::{Part, PartInput, PROBE_PART_NUMBER};

const SELECT_PARTS: &str = r#"
    SELECT
        part_number, pipe_size_in, bellows_id_in, bellows_od_in,
        live_length_in, overall_length_in,
        pressure_psig, max_allowable_pressure_psig, temperature_f,
        number_of_cycles, cycles_format,
        bellows_material, bellows_material_grade, number_of_plys,
        axial_movement_in, axial_spring_rate_lbf_in,
        lateral_movement_in, lateral_spring_rate_lbf_in,
        angular_movement_deg, angular_spring_rate_ft_lbs_deg,
        weld_neck_material, weld_neck_grade, image_url,
        created_at, updated_at
    FROM bellows_parts
"#;

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Repository for part database operations.
#[derive(Debug, Clone)]
pub struct PartRepository {
    pool: SqlitePool,
}

impl PartRepository {
    /// Creates a new PartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PartRepository { pool }
    }

    /// The configurator's catalog read.
    ///
    /// Never fails: a store error is logged and an empty catalog returned.
    pub async fn get_all(&self) -> Vec<Part> {
        match self.list_all().await {
            Ok(parts) => parts,
            Err(e) => {
                error!(error = %e, "Failed to load catalog, serving an empty one");
                Vec::new()
            }
        }
    }

    /// Every part, sorted by part number ascending.
    pub async fn list_all(&self) -> DbResult<Vec<Part>> {
        let sql = format!("{SELECT_PARTS} ORDER BY part_number ASC");
        let parts = sqlx::query_as::<_, Part>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = parts.len(), "Loaded catalog");
        Ok(parts)
    }

    /// Case-insensitive substring search on part number or material.
    ///
    /// An empty term lists everything.
    pub async fn search(&self, term: &str) -> DbResult<Vec<Part>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list_all().await;
        }

        debug!(term = %term, "Searching parts");

        let pattern = format!("%{}%", term);
        let sql = format!(
            "{SELECT_PARTS} WHERE part_number LIKE ?1 OR bellows_material LIKE ?1 \
             ORDER BY part_number ASC"
        );
        let parts = sqlx::query_as::<_, Part>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = parts.len(), "Search returned parts");
        Ok(parts)
    }

    /// Gets a part by part number (case-insensitive).
    pub async fn get_by_part_number(&self, part_number: &str) -> DbResult<Option<Part>> {
        let sql = format!("{SELECT_PARTS} WHERE part_number = ?1");
        let part = sqlx::query_as::<_, Part>(&sql)
            .bind(part_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(part)
    }

    /// Inserts a new part.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - part number already exists
    pub async fn insert(&self, part: &Part) -> DbResult<Part> {
        debug!(part_number = %part.part_number, "Inserting part");

        sqlx::query(
            r#"
            INSERT INTO bellows_parts (
                part_number, pipe_size_in, bellows_id_in, bellows_od_in,
                live_length_in, overall_length_in,
                pressure_psig, max_allowable_pressure_psig, temperature_f,
                number_of_cycles, cycles_format,
                bellows_material, bellows_material_grade, number_of_plys,
                axial_movement_in, axial_spring_rate_lbf_in,
                lateral_movement_in, lateral_spring_rate_lbf_in,
                angular_movement_deg, angular_spring_rate_ft_lbs_deg,
                weld_neck_material, weld_neck_grade, image_url,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6,
                ?7, ?8, ?9,
                ?10, ?11,
                ?12, ?13, ?14,
                ?15, ?16,
                ?17, ?18,
                ?19, ?20,
                ?21, ?22, ?23,
                ?24, ?25
            )
            "#,
        )
        .bind(&part.part_number)
        .bind(part.pipe_size_in)
        .bind(part.bellows_id_in)
        .bind(part.bellows_od_in)
        .bind(part.live_length_in)
        .bind(part.overall_length_in)
        .bind(&part.pressure_psig)
        .bind(part.max_allowable_pressure_psig)
        .bind(&part.temperature_f)
        .bind(&part.number_of_cycles)
        .bind(part.cycles_format)
        .bind(&part.bellows_material)
        .bind(&part.bellows_material_grade)
        .bind(&part.number_of_plys)
        .bind(part.axial_movement_in)
        .bind(part.axial_spring_rate_lbf_in)
        .bind(part.lateral_movement_in)
        .bind(part.lateral_spring_rate_lbf_in)
        .bind(part.angular_movement_deg)
        .bind(part.angular_spring_rate_ft_lbs_deg)
        .bind(&part.weld_neck_material)
        .bind(&part.weld_neck_grade)
        .bind(&part.image_url)
        .bind(part.created_at)
        .bind(part.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value("part_number", &part.part_number))?;

        Ok(part.clone())
    }

    /// Updates every editable field of an existing part.
    ///
    /// The part number itself is immutable: `input.part_number` is ignored.
    ///
    /// ## Returns
    /// * `Ok(Part)` - The stored part after the update
    /// * `Err(DbError::NotFound)` - No such part number
    pub async fn update(&self, part_number: &str, input: &PartInput) -> DbResult<Part> {
        debug!(part_number = %part_number, "Updating part");

        let now = Utc::now();
        let image_url = input
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty());

        let result = sqlx::query(
            r#"
            UPDATE bellows_parts SET
                pipe_size_in = ?2,
                bellows_id_in = ?3,
                bellows_od_in = ?4,
                live_length_in = ?5,
                overall_length_in = ?6,
                pressure_psig = ?7,
                max_allowable_pressure_psig = ?8,
                temperature_f = ?9,
                number_of_cycles = ?10,
                cycles_format = ?11,
                bellows_material = ?12,
                bellows_material_grade = ?13,
                number_of_plys = ?14,
                axial_movement_in = ?15,
                axial_spring_rate_lbf_in = ?16,
                lateral_movement_in = ?17,
                lateral_spring_rate_lbf_in = ?18,
                angular_movement_deg = ?19,
                angular_spring_rate_ft_lbs_deg = ?20,
                weld_neck_material = ?21,
                weld_neck_grade = ?22,
                image_url = ?23,
                updated_at = ?24
            WHERE part_number = ?1
            "#,
        )
        .bind(part_number)
        .bind(input.pipe_size_in)
        .bind(input.bellows_id_in)
        .bind(input.bellows_od_in)
        .bind(input.live_length_in)
        .bind(input.overall_length_in)
        .bind(&input.pressure_psig)
        .bind(input.max_allowable_pressure_psig)
        .bind(&input.temperature_f)
        .bind(&input.number_of_cycles)
        .bind(input.cycles_format)
        .bind(&input.bellows_material)
        .bind(&input.bellows_material_grade)
        .bind(&input.number_of_plys)
        .bind(input.axial_movement_in)
        .bind(input.axial_spring_rate_lbf_in)
        .bind(input.lateral_movement_in)
        .bind(input.lateral_spring_rate_lbf_in)
        .bind(input.angular_movement_deg)
        .bind(input.angular_spring_rate_ft_lbs_deg)
        .bind(&input.weld_neck_material)
        .bind(&input.weld_neck_grade)
        .bind(image_url)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Part", part_number));
        }

        self.get_by_part_number(part_number)
            .await?
            .ok_or_else(|| DbError::not_found("Part", part_number))
    }

    /// Deletes a part by part number.
    pub async fn delete(&self, part_number: &str) -> DbResult<()> {
        debug!(part_number = %part_number, "Deleting part");

        let result = sqlx::query("DELETE FROM bellows_parts WHERE part_number = ?1")
            .bind(part_number)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Part", part_number));
        }

        Ok(())
    }

    /// Counts parts (for diagnostics and bootstrap).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bellows_parts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Inserts each part independently; failures are skipped, not fatal.
    pub async fn import(&self, parts: &[Part]) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for part in parts {
            match self.insert(part).await {
                Ok(_) => summary.imported += 1,
                Err(e) => {
                    warn!(part_number = %part.part_number, error = %e, "Skipped part during import");
                    summary.skipped += 1;
                }
            }
        }

        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "Catalog import finished"
        );
        summary
    }

    /// Proves write access by creating and deleting the reserved probe part.
    pub async fn probe_write(&self) -> DbResult<()> {
        // A probe left behind by an interrupted run would fail the insert.
        let _ = self.delete(PROBE_PART_NUMBER).await;

        let probe = Part::from_input(
            PartInput {
                part_number: PROBE_PART_NUMBER.to_string(),
                bellows_material: "PROBE".to_string(),
                ..PartInput::default()
            },
            Utc::now(),
        );

        self.insert(&probe).await?;
        self.delete(PROBE_PART_NUMBER).await?;

        debug!("Write probe succeeded");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use bellows_core::CycleFormat;

    fn input(part_number: &str, material: &str) -> PartInput {
        PartInput {
            part_number: part_number.to_string(),
            pipe_size_in: 4.0,
            overall_length_in: 20.0,
            pressure_psig: "150".to_string(),
            temperature_f: "200".to_string(),
            cycles_format: CycleFormat::Concurrent,
            bellows_material: material.to_string(),
            image_url: Some("http://localhost/images/parts/a.png".to_string()),
            ..PartInput::default()
        }
    }

    fn part(part_number: &str, material: &str) -> Part {
        Part::from_input(input(part_number, material), Utc::now())
    }

    async fn repo() -> PartRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().parts()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;
        repo.insert(&part("104-020-0001", "ASTM A240")).await.unwrap();

        let stored = repo.get_by_part_number("104-020-0001").await.unwrap().unwrap();
        assert_eq!(stored.pipe_size_in, 4.0);
        assert_eq!(stored.cycles_format, CycleFormat::Concurrent);
        assert_eq!(stored.temperature_f, "200");
        assert_eq!(
            stored.image_url.as_deref(),
            Some("http://localhost/images/parts/a.png")
        );
    }

    #[tokio::test]
    async fn test_list_all_sorted_by_part_number() {
        let repo = repo().await;
        for pn in ["106-012-0001", "102-008-0001", "104-020-0001"] {
            repo.insert(&part(pn, "ASTM A240")).await.unwrap();
        }

        let numbers: Vec<String> = repo
            .get_all()
            .await
            .into_iter()
            .map(|p| p.part_number)
            .collect();
        assert_eq!(numbers, vec!["102-008-0001", "104-020-0001", "106-012-0001"]);
    }

    #[tokio::test]
    async fn test_duplicate_is_case_insensitive_unique_violation() {
        let repo = repo().await;
        repo.insert(&part("104-020-0001", "ASTM A240")).await.unwrap();

        let err = repo.insert(&part("104-020-0001", "Inconel")).await.unwrap_err();
        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "part_number");
                assert_eq!(value, "104-020-0001");
            }
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_matches_number_or_material() {
        let repo = repo().await;
        repo.insert(&part("104-020-0001", "ASTM A240")).await.unwrap();
        repo.insert(&part("106-012-0001", "Inconel 625")).await.unwrap();

        assert_eq!(repo.search("inconel").await.unwrap().len(), 1);
        assert_eq!(repo.search("104-020").await.unwrap().len(), 1);
        assert_eq!(repo.search("  ").await.unwrap().len(), 2);
        assert!(repo.search("hastelloy").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_part_number_and_created_at() {
        let repo = repo().await;
        let original = repo.insert(&part("104-020-0001", "ASTM A240")).await.unwrap();

        let mut changes = input("999-000-0000", "Inconel 625");
        changes.overall_length_in = 24.0;
        changes.image_url = Some("  ".to_string());

        let updated = repo.update("104-020-0001", &changes).await.unwrap();
        assert_eq!(updated.part_number, "104-020-0001");
        assert_eq!(updated.overall_length_in, 24.0);
        assert_eq!(updated.bellows_material, "Inconel 625");
        assert_eq!(updated.image_url, None);
        assert_eq!(updated.created_at, original.created_at);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_part() {
        let repo = repo().await;
        let err = repo
            .update("104-020-0001", &input("104-020-0001", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = repo.delete("104-020-0001").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_import_reports_skipped_rows() {
        let repo = repo().await;
        repo.insert(&part("104-020-0001", "ASTM A240")).await.unwrap();

        let batch = vec![
            part("104-020-0001", "ASTM A240"),
            part("106-012-0001", "ASTM A240"),
            part("108-012-0001", "ASTM A240"),
        ];
        let summary = repo.import(&batch).await;
        assert_eq!(summary, ImportSummary { imported: 2, skipped: 1 });
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_probe_write_leaves_no_trace() {
        let repo = repo().await;
        repo.probe_write().await.unwrap();
        repo.probe_write().await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_all_is_empty_when_store_fails() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(db.parts().get_all().await.is_empty());
    }
}
