use std::sync::{Arc, Mutex};

use embassy_button_events::{
    ButtonConfig, ButtonController, EventRegistry, Level, LogReporter, Reporter,
};

// --- Capturing logger ---

struct Captured {
    records: Mutex<Vec<(Level, String, String)>>,
}

impl log::Log for Captured {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        self.records.lock().unwrap().push((
            record.level(),
            record.target().to_string(),
            record.args().to_string(),
        ));
    }

    fn flush(&self) {}
}

static LOGGER: Captured = Captured {
    records: Mutex::new(Vec::new()),
};

// One logger per process, so everything touching it lives in this single test.
#[test]
fn log_reporter_forwards_to_log_facade() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(log::LevelFilter::Trace);

    LogReporter::new("panel").report(Level::Warn, format_args!("key {} stuck", 3));
    assert_eq!(
        LOGGER.records.lock().unwrap().last().cloned(),
        Some((Level::Warn, "panel".to_string(), "key 3 stuck".to_string()))
    );

    let registry =
        EventRegistry::<()>::with_events(["push"]).with_reporter(Arc::new(LogReporter::default()));
    let _ = registry.declare("push");
    assert_eq!(
        LOGGER.records.lock().unwrap().last().cloned(),
        Some((
            Level::Info,
            "button".to_string(),
            "event already declared: push".to_string()
        ))
    );

    let controller =
        ButtonController::with_reporter(ButtonConfig::default(), Arc::new(LogReporter::default()))
            .unwrap();
    controller.on_edge(true);
    controller.on_edge(true);
    let records = LOGGER.records.lock().unwrap();
    assert!(records
        .iter()
        .any(|(level, target, message)| *level == Level::Debug
            && target == "button"
            && message == "push while already pressed"));
}
