//! Background next-approach lookups.
//!
//! One task per displayed record runs on a small rayon pool. A task owns a
//! single record id and reports `(id, result)` over a channel; the owner of
//! the record list applies it to that record's write-once slot. Failures and
//! empty answers both become [`NextApproach::Unavailable`].
//!
//! The search starts after the primary fetch window, so a second approach
//! that is already charted is never reported as the "next" one.

use std::collections::HashSet;
use std::sync::{mpsc, Arc};

use chrono::NaiveDate;

use super::api::{fetch_next_approach, ApproachSource};
use crate::error::{NeoError, Result};
use crate::transform::{NeoRecord, NextApproach};

type Notify = Arc<dyn Fn() + Send + Sync>;

pub struct NextApproachLoader {
    pool: rayon::ThreadPool,
    source: Arc<dyn ApproachSource>,
    years: u32,
    window_end: NaiveDate,
    tx: mpsc::Sender<(usize, NextApproach)>,
    rx: mpsc::Receiver<(usize, NextApproach)>,
    pending: HashSet<usize>,
    notify: Option<Notify>,
}

impl NextApproachLoader {
    pub fn new(
        source: Arc<dyn ApproachSource>,
        workers: usize,
        years: u32,
        window_end: NaiveDate,
    ) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("lookahead-{}", i))
            .build()
            .map_err(|e| NeoError::Config(format!("lookahead pool: {}", e)))?;
        let (tx, rx) = mpsc::channel();

        Ok(Self {
            pool,
            source,
            years,
            window_end,
            tx,
            rx,
            pending: HashSet::new(),
            notify: None,
        })
    }

    /// Callback run on the worker thread after each result is sent
    /// (the window uses it to request a repaint).
    pub fn with_notify(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notify = Some(Arc::new(notify));
        self
    }

    /// Queue a lookup for one record. Resolved or already queued records are
    /// ignored.
    pub fn request(&mut self, record: &NeoRecord) {
        if !record.next_approach.is_pending() || !self.pending.insert(record.id) {
            return;
        }

        let id = record.id;
        let designation = record.designation.clone();
        let after = record.closest_date.max(self.window_end);
        let years = self.years;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let notify = self.notify.clone();

        self.pool.spawn(move || {
            let next = match fetch_next_approach(source.as_ref(), &designation, after, years) {
                Ok(Some(date)) => NextApproach::Found(date),
                Ok(None) => NextApproach::Unavailable,
                Err(e) => {
                    log::debug!("next approach for {} unavailable: {}", designation, e);
                    NextApproach::Unavailable
                }
            };
            let _ = tx.send((id, next));
            if let Some(notify) = notify {
                notify();
            }
        });
    }

    pub fn request_all(&mut self, records: &[NeoRecord]) {
        for record in records {
            self.request(record);
        }
    }

    /// Lookups still in flight.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Apply every result that has arrived. Non-blocking; returns how many
    /// records changed.
    pub fn apply_ready(&mut self, records: &mut [NeoRecord]) -> usize {
        let mut applied = 0;
        while let Ok((id, next)) = self.rx.try_recv() {
            applied += self.apply_one(records, id, next) as usize;
        }
        applied
    }

    /// Block until every queued lookup has reported.
    pub fn wait_all(&mut self, records: &mut [NeoRecord]) -> usize {
        let mut applied = 0;
        while !self.pending.is_empty() {
            match self.rx.recv() {
                Ok((id, next)) => applied += self.apply_one(records, id, next) as usize,
                Err(_) => break,
            }
        }
        applied
    }

    fn apply_one(&mut self, records: &mut [NeoRecord], id: usize, next: NextApproach) -> bool {
        self.pending.remove(&id);
        records
            .iter_mut()
            .find(|r| r.id == id)
            .map(|r| r.resolve_next_approach(next))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::api::fixtures::*;
    use crate::transform::enrich::enrich;
    use crate::transform::schema::RawApproach;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(id: usize, des: &str) -> NeoRecord {
        let raw = RawApproach {
            designation: des.into(),
            orbit_id: "3".into(),
            h: 22.0,
            v_rel: 8.0,
            dist: 0.02,
            cd: "2020-Dec-10 00:00".into(),
        };
        enrich(raw, ymd(2020, 12, 2), id).unwrap()
    }

    fn window_end() -> NaiveDate {
        ymd(2021, 3, 2)
    }

    fn source() -> Arc<FixtureSource> {
        let mut source = FixtureSource::default();
        source.next.insert(
            "A".into(),
            Some(cad_table(vec![cad_row("A", "3", "2027-Jun-01 08:00", "0.2", "8", "22")])),
        );
        source.next.insert("C".into(), None);
        Arc::new(source)
    }

    #[test]
    fn results_patch_only_their_own_record() {
        let mut records = vec![record(0, "A"), record(1, "B"), record(2, "C")];
        let mut loader = NextApproachLoader::new(source(), 2, 10, window_end()).unwrap();
        loader.request_all(&records);
        assert_eq!(loader.pending(), 3);

        let applied = loader.wait_all(&mut records);
        assert_eq!(applied, 3);
        assert_eq!(loader.pending(), 0);
        assert_eq!(records[0].next_approach, NextApproach::Found(ymd(2027, 6, 1)));
        assert_eq!(records[1].next_approach, NextApproach::Unavailable);
        assert_eq!(records[2].next_approach, NextApproach::Unavailable);
        assert_eq!(records[0].designation, "A");
    }

    #[test]
    fn duplicate_and_resolved_requests_are_skipped() {
        let src = source();
        let mut records = vec![record(0, "A")];
        let mut loader = NextApproachLoader::new(src.clone(), 1, 10, window_end()).unwrap();
        loader.request(&records[0]);
        loader.request(&records[0]);
        assert_eq!(loader.pending(), 1);
        loader.wait_all(&mut records);

        loader.request(&records[0]);
        assert_eq!(loader.pending(), 0);
        assert_eq!(src.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn notify_runs_per_result() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let mut records = vec![record(0, "A"), record(1, "B")];
        let mut loader = NextApproachLoader::new(source(), 2, 10, window_end())
            .unwrap()
            .with_notify(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        loader.request_all(&records);
        loader.wait_all(&mut records);
        // The notify call follows the send, so give the last worker a moment
        for _ in 0..100 {
            if count.load(Ordering::SeqCst) == 2 {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn apply_ready_does_not_block() {
        let mut records = vec![record(0, "A")];
        let mut loader = NextApproachLoader::new(source(), 1, 10, window_end()).unwrap();
        assert_eq!(loader.apply_ready(&mut records), 0);
        loader.request_all(&records);
        let mut applied = 0;
        for _ in 0..200 {
            applied += loader.apply_ready(&mut records);
            if applied == 1 {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(applied, 1);
        assert!(!records[0].next_approach.is_pending());
    }

    #[test]
    fn search_starts_after_the_fetch_window() {
        let src = source();
        let mut records = vec![record(0, "A")];
        let mut loader = NextApproachLoader::new(src.clone(), 1, 10, window_end()).unwrap();
        loader.request_all(&records);
        loader.wait_all(&mut records);

        let seen = src.seen.lock().unwrap();
        assert_eq!(seen[0].date_min, ymd(2021, 3, 3));
        assert_eq!(seen[0].designation.as_deref(), Some("A"));
    }

    #[test]
    fn approach_beyond_window_searches_from_its_own_date() {
        let src = source();
        let mut records = vec![record(0, "A")];
        let mut loader = NextApproachLoader::new(src.clone(), 1, 10, ymd(2020, 12, 5)).unwrap();
        loader.request_all(&records);
        loader.wait_all(&mut records);

        assert_eq!(src.seen.lock().unwrap()[0].date_min, ymd(2020, 12, 11));
    }
}
