//! Integration tests for the 560B init sequence.
//!
//! Runs `tjreg::initialize` against the simulated TigerJet and checks the
//! register traffic it produces, including config loaded from disk.

use tigerjet_transport::sim::{Call, SimulatedTigerJet, Stage};
use tigerjet_transport::{Errno, IdentityMismatch, RegisterError, ReportFrame, Request};
use tjreg::tj560b::{reg, REPORT_DTMF_HOOK};
use tjreg::{initialize, InitConfig, RegisterWrite};

/// Requests in the order they were committed to the device
fn committed_requests(dev: &SimulatedTigerJet) -> Vec<Request> {
    dev.calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::SetUsages { values, .. } => ReportFrame::parse(&values),
            _ => None,
        })
        .collect()
}

#[test]
fn default_sequence() {
    let dev = SimulatedTigerJet::new(0x0001);
    initialize(&dev, &InitConfig::default()).unwrap();

    assert_eq!(
        committed_requests(&dev),
        vec![
            Request::Read {
                address: reg::REPORT_ENABLE
            },
            Request::Write {
                address: reg::REPORT_ENABLE,
                value: REPORT_DTMF_HOOK
            },
            Request::Write {
                address: reg::DTMF_THRESHOLD_LO,
                value: 0x50
            },
            Request::Write {
                address: reg::DTMF_THRESHOLD_HI,
                value: 0x00
            },
        ]
    );
    assert_eq!(dev.register(reg::REPORT_ENABLE), 0x40);
    assert_eq!(dev.register(reg::DTMF_THRESHOLD_LO), 0x50);
    assert_eq!(dev.register(reg::DTMF_THRESHOLD_HI), 0x00);
}

#[test]
fn extra_writes_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("init.toml");
    std::fs::write(
        &path,
        r#"
dtmf_threshold = 0x0070

[[extra_writes]]
address = 0x20
value = 0x11

[[extra_writes]]
address = 0x21
value = 0x22
"#,
    )
    .unwrap();

    let config = InitConfig::load(&path).unwrap();
    assert_eq!(
        config.extra_writes,
        vec![
            RegisterWrite {
                address: 0x20,
                value: 0x11
            },
            RegisterWrite {
                address: 0x21,
                value: 0x22
            },
        ]
    );

    let dev = SimulatedTigerJet::new(0x0001);
    initialize(&dev, &config).unwrap();
    assert_eq!(dev.register(reg::DTMF_THRESHOLD_LO), 0x70);
    assert_eq!(dev.register(0x20), 0x11);
    assert_eq!(dev.register(0x21), 0x22);

    let last = committed_requests(&dev).pop();
    assert_eq!(
        last,
        Some(Request::Write {
            address: 0x21,
            value: 0x22
        })
    );
}

#[test]
fn not_a_tigerjet() {
    let dev = SimulatedTigerJet::with_vendor(0x046D, 0xC52B);
    let err = initialize(&dev, &InitConfig::default()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<RegisterError>(),
        Some(&RegisterError::NotTigerJet(IdentityMismatch::Vendor(0x046D)))
    );
    assert!(err.to_string().contains("report enable"));
    assert_eq!(dev.report_ops(), 0);
}

#[test]
fn stops_at_first_failure() {
    let dev = SimulatedTigerJet::new(0x0001);
    dev.fail_at(Stage::GetUsages, Errno::EIO);
    assert!(initialize(&dev, &InitConfig::default()).is_err());
    // Only the report-enable read was attempted
    assert_eq!(committed_requests(&dev).len(), 1);
    assert_eq!(dev.register(reg::DTMF_THRESHOLD_LO), 0);
}
