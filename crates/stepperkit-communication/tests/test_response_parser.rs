mod common;

use common::MockTransport;
use stepperkit_communication::{read_until_valid, MdriveResponseParser};
use stepperkit_core::PolledSample;

#[test]
fn test_parse_position_and_status() {
    let parser = MdriveResponseParser::new();
    assert_eq!(parser.parse("1500 0"), Some(PolledSample::new(1500, 0)));
    assert_eq!(parser.parse("-320 84"), Some(PolledSample::new(-320, 84)));
    assert_eq!(parser.parse("  12800 83 "), Some(PolledSample::new(12800, 83)));
}

#[test]
fn test_parse_rejects_noise() {
    let parser = MdriveResponseParser::new();
    assert_eq!(parser.parse(""), None);
    assert_eq!(parser.parse("garbage"), None);
    assert_eq!(parser.parse("1500 abc"), None);
    assert_eq!(parser.parse("1500"), None);
    assert_eq!(parser.parse("1500 0 7"), None);
    assert_eq!(parser.parse("1500  0"), None);
    assert_eq!(parser.parse("PR C1 \" \" ER"), None);
    assert_eq!(parser.parse("1500.5 0"), None);
}

#[test]
fn test_read_skips_echo_and_blank_lines() {
    let mut transport = MockTransport::new().with_replies(["PR C1 \" \" ER", "", "1200 0"]);
    let reads = transport.read_count();
    let parser = MdriveResponseParser::new();

    let sample = read_until_valid(&mut transport, &parser, 5, false).unwrap();
    assert_eq!(sample, Some(PolledSample::new(1200, 0)));
    assert_eq!(*reads.lock(), 3);
}

#[test]
fn test_read_gives_up_after_bound() {
    let mut transport = MockTransport::new()
        .with_replies(["garbage", "1500 abc", "", "x y", "?"])
        .with_default_reply("99 0");
    let reads = transport.read_count();
    let parser = MdriveResponseParser::new();

    let sample = read_until_valid(&mut transport, &parser, 5, true).unwrap();
    assert_eq!(sample, None);
    assert_eq!(*reads.lock(), 5);
}
