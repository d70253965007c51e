use crate::core::models::residue::ResidueId;

/// Events emitted while a structure is being annotated.
#[derive(Debug, Clone)]
pub enum Progress {
    ScanStart { total_pairs: u64 },
    PairExamined,
    RelationFound {
        reference: ResidueId,
        residue: ResidueId,
        labels: usize,
    },
    ScanFinish { relations: usize },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events to an optional callback.
///
/// The callback may be invoked from several worker threads at once.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn is_silent(&self) -> bool {
        self.callback.is_none()
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn silent_reporter_drops_events() {
        let reporter = ProgressReporter::new();
        assert!(reporter.is_silent());
        reporter.report(Progress::PairExamined);
    }

    #[test]
    fn callback_receives_events_in_order() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            let tag = match event {
                Progress::ScanStart { total_pairs } => format!("start:{total_pairs}"),
                Progress::RelationFound { labels, .. } => format!("relation:{labels}"),
                Progress::ScanFinish { relations } => format!("finish:{relations}"),
                _ => "other".to_string(),
            };
            seen.lock().unwrap().push(tag);
        }));
        assert!(!reporter.is_silent());
        reporter.report(Progress::ScanStart { total_pairs: 1 });
        reporter.report(Progress::RelationFound {
            reference: ResidueId::new('A', 1),
            residue: ResidueId::new('A', 2),
            labels: 3,
        });
        reporter.report(Progress::ScanFinish { relations: 1 });
        drop(reporter);
        assert_eq!(
            seen.into_inner().unwrap(),
            vec!["start:1", "relation:3", "finish:1"]
        );
    }
}
