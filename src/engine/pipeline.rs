use std::sync::Arc;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::VizConfig;
use crate::error::Result;
use crate::net::api::{fetch_approaches, ApproachSource, ApproachTable};
use crate::net::fetch::HttpSource;
use crate::render::layout::{lane, layout_records, Placement};
use crate::render::scene::{build_scene, Scene};
use crate::transform::enrich::{enrich, filter_and_sort};
use crate::transform::schema::{to_record, ApproachSchema};
use crate::transform::NeoRecord;

/// Per-load parameters, fixed when the load starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineContext {
    pub reference_date: NaiveDate,
    pub window_days: u32,
    pub limit: u32,
    pub threshold_ld: f64,
}

impl PipelineContext {
    pub fn from_config(config: &VizConfig) -> Self {
        Self {
            reference_date: config.reference_date(),
            window_days: config.window_days,
            limit: config.limit,
            threshold_ld: config.threshold_ld,
        }
    }

    /// Last day covered by the primary fetch.
    pub fn window_end(&self) -> NaiveDate {
        self.reference_date
            .checked_add_days(chrono::Days::new(self.window_days as u64))
            .unwrap_or(NaiveDate::MAX)
    }
}

/// Everything one load produced.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub context: PipelineContext,
    /// Settings the records were laid out with
    pub config: VizConfig,
    /// Displayed records, nearest first; `id` equals position
    pub records: Vec<NeoRecord>,
    pub placements: Vec<Placement>,
    /// Rows in the API response
    pub total_rows: usize,
    /// Rows dropped for bad values before filtering
    pub skipped_rows: usize,
}

impl PipelineResult {
    /// Chart for the current records. Grid, header and circles all use the
    /// settings of this load, not whatever the caller has edited since.
    pub fn scene(&self) -> Scene {
        build_scene(
            &self.records,
            &self.placements,
            &self.config,
            self.context.reference_date,
        )
    }
}

/// The visualizer pipeline: Fetch → Schema → Enrich → Filter/Sort → Layout
pub struct NeoEngine {
    config: VizConfig,
    source: Arc<dyn ApproachSource>,
}

impl NeoEngine {
    /// Engine backed by the HTTP endpoint from `config`.
    pub fn new(config: VizConfig) -> Result<Self> {
        config.validate()?;
        let source = HttpSource::new(
            &config.endpoint,
            std::time::Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self {
            config,
            source: Arc::new(source),
        })
    }

    /// Engine backed by any source (fixtures in tests).
    pub fn with_source(config: VizConfig, source: Arc<dyn ApproachSource>) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &VizConfig {
        &self.config
    }

    /// Shared handle for the next-approach loader.
    pub fn source(&self) -> Arc<dyn ApproachSource> {
        Arc::clone(&self.source)
    }

    /// Run the primary fetch and the full transform/layout pipeline.
    pub fn load(&self) -> Result<PipelineResult> {
        let context = PipelineContext::from_config(&self.config);
        log::info!(
            "fetching approaches {} +{}d (limit {})",
            context.reference_date,
            context.window_days,
            context.limit
        );
        let table = fetch_approaches(
            self.source.as_ref(),
            context.reference_date,
            context.window_days,
            context.limit,
        )?;
        self.process_table(&table, context)
    }

    /// Transform an already-fetched table.
    pub fn process_table(
        &self,
        table: &ApproachTable,
        context: PipelineContext,
    ) -> Result<PipelineResult> {
        let total_rows = table.len();
        let config = VizConfig {
            reference_date: Some(context.reference_date),
            window_days: context.window_days,
            limit: context.limit,
            threshold_ld: context.threshold_ld,
            ..self.config.clone()
        };
        if table.is_empty() {
            log::info!("no close approaches in window");
            return Ok(PipelineResult {
                context,
                config,
                records: Vec::new(),
                placements: Vec::new(),
                total_rows,
                skipped_rows: 0,
            });
        }

        // Phase 1: Schema; a missing field fails the whole load
        let schema = ApproachSchema::from_fields(&table.fields)?;

        // Phase 2: Project + enrich; bad rows are dropped individually
        let mut skipped_rows = 0;
        let mut enriched = Vec::with_capacity(total_rows);
        for (index, row) in table.data.iter().enumerate() {
            let record = to_record(row, &schema).and_then(|raw| {
                lane(&raw.orbit_id)?;
                enrich(raw, context.reference_date, index)
            });
            match record {
                Ok(record) => enriched.push(record),
                Err(e) => {
                    skipped_rows += 1;
                    log::warn!("skipping row {}: {}", index, e);
                }
            }
        }

        // Phase 3: Filter + sort, ids assigned by position
        let records = filter_and_sort(enriched, context.threshold_ld);

        // Phase 4: Layout
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let placements = layout_records(&records, &config, &mut rng);

        log::info!(
            "{} of {} approaches within {} LD ({} skipped)",
            records.len(),
            total_rows,
            context.threshold_ld,
            skipped_rows
        );

        Ok(PipelineResult {
            context,
            config,
            records,
            placements,
            total_rows,
            skipped_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NeoError;
    use crate::net::api::fixtures::*;
    use crate::render::color::ApproachColor;
    use crate::render::scene::Shape;

    fn config() -> VizConfig {
        VizConfig {
            reference_date: NaiveDate::from_ymd_opt(2020, 12, 2),
            seed: Some(11),
            ..VizConfig::default()
        }
    }

    fn window() -> ApproachTable {
        cad_table(vec![
            // 21.87 LD now: beyond 20
            cad_row("2020 XY", "4", "2020-Dec-10 00:00", "0.01", "10", "20"),
            // today, 2 LD
            cad_row("2020 XZ", "7", "2020-Dec-02 04:11", "0.005138", "6.3", "27.1"),
            // 3 days out, ~1.2 + 3*1.08 LD
            cad_row("2020 YA", "12", "2020-Dec-05 16:40", "0.003", "4.8", "29.4"),
            // bad lane digit
            cad_row("2020 YB", "12a", "2020-Dec-04 00:00", "0.001", "3", "28"),
            // bad month
            cad_row("2020 YC", "3", "2020-Dex-04 00:00", "0.001", "3", "28"),
        ])
    }

    fn engine(table: Option<ApproachTable>) -> NeoEngine {
        let source = FixtureSource { window: table, ..Default::default() };
        NeoEngine::with_source(config(), Arc::new(source))
    }

    #[test]
    fn full_pipeline_filters_sorts_and_places() {
        let result = engine(Some(window())).load().unwrap();
        assert_eq!(result.total_rows, 5);
        assert_eq!(result.skipped_rows, 2);

        let names: Vec<&str> = result.records.iter().map(|r| r.designation.as_str()).collect();
        assert_eq!(names, vec!["2020 XZ", "2020 YA"]);
        assert_eq!(result.records[0].id, 0);
        assert_eq!(result.records[1].id, 1);

        assert_eq!(result.placements.len(), 2);
        let first = result.placements.iter().find(|p| p.id == 0).unwrap();
        assert_eq!(first.lane, 7);
        assert_eq!(first.color, ApproachColor::White);
        assert_eq!(first.y, 60.0);
        assert!(first.x >= 700.0 && first.x < 800.0);
        let second = result.placements.iter().find(|p| p.id == 1).unwrap();
        assert_eq!(second.lane, 2);
        assert_eq!(second.color, ApproachColor::LightGray);
    }

    #[test]
    fn seeded_loads_are_reproducible() {
        let a = engine(Some(window())).load().unwrap();
        let b = engine(Some(window())).load().unwrap();
        assert_eq!(a.placements, b.placements);
    }

    #[test]
    fn primary_fetch_failure_is_surfaced() {
        let err = engine(None).load().unwrap_err();
        assert!(matches!(err, NeoError::Network(_)));
    }

    #[test]
    fn schema_mismatch_fails_whole_load() {
        let mut table = window();
        table.fields.retain(|f| f != "h");
        let err = engine(Some(table)).load().unwrap_err();
        assert!(matches!(err, NeoError::Decode(_)));
    }

    #[test]
    fn empty_window_gives_empty_result() {
        let result = engine(Some(ApproachTable::default())).load().unwrap();
        assert!(result.records.is_empty());
        assert_eq!(result.total_rows, 0);
        let scene = result.scene();
        assert_eq!(scene.circle_count(), 0);
    }

    #[test]
    fn scene_uses_settings_of_the_load() {
        // 18 LD today, inside the 20 LD threshold
        let table = cad_table(vec![cad_row(
            "2020 XQ", "5", "2020-Dec-02 00:00", "0.046242", "5", "24",
        )]);
        let app_config = config();
        let engine = NeoEngine::with_source(
            app_config.clone(),
            Arc::new(FixtureSource { window: Some(table), ..Default::default() }),
        );
        let result = engine.load().unwrap();
        assert_eq!(result.records.len(), 1);

        // Later edits to the caller's copy must not leak into the chart
        let mut edited = app_config;
        edited.threshold_ld = 40.0;
        assert_ne!(result.config, edited);
        assert_eq!(result.config.threshold_ld, 20.0);

        let scene = result.scene();
        let circle_y = scene
            .shapes
            .iter()
            .find_map(|s| match s {
                Shape::Circle { cy, .. } => Some(*cy),
                _ => None,
            })
            .unwrap();
        let grid_20 = scene
            .shapes
            .iter()
            .find_map(|s| match s {
                Shape::Text(t) if t.label == "20" && t.value == "LD" => Some(t.y - 4.0),
                _ => None,
            })
            .unwrap();
        assert!(circle_y < grid_20);

        let header = scene
            .shapes
            .iter()
            .find_map(|s| match s {
                Shape::Text(t) if t.value.contains("within") => Some(t.value.clone()),
                _ => None,
            })
            .unwrap();
        assert!(header.starts_with("1 within 20 LD"), "{}", header);
    }

    #[test]
    fn window_end_follows_context() {
        let context = PipelineContext::from_config(&config());
        assert_eq!(context.window_end(), NaiveDate::from_ymd_opt(2021, 3, 2).unwrap());
    }
}
