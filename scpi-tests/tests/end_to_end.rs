use scpi_client::ScpiClient;
use scpi_protocol::error::ReadError;
use scpi_protocol::{ImageFormat, Response, ScreenshotOptions};
use scpi_tests::{MockInstrument, Reply};

#[test]
fn raw_query_with_block_reply() {
    let instrument = MockInstrument::serve(vec![Reply::Block(b"hello".to_vec())]);
    let mut client = ScpiClient::connect(instrument.addr()).unwrap();

    let mut sink = Vec::new();
    let response = client.raw(":WAVeform:SOURce?", &mut sink).unwrap();

    assert_eq!(response, Some(Response::Block { len: 5 }));
    // The payload arrives as-is, without any appended newline.
    assert_eq!(sink, b"hello".to_vec());
    drop(client);
    assert_eq!(instrument.finish(), vec![":WAVeform:SOURce? \n".to_string()]);
}

#[test]
fn raw_query_with_line_reply() {
    let instrument = MockInstrument::serve(vec![Reply::Verbatim(b"RIGOL,DS1104Z\n".to_vec())]);
    let mut client = ScpiClient::connect(instrument.addr()).unwrap();

    let mut sink = Vec::new();
    let response = client.raw("*IDN?", &mut sink).unwrap();

    assert_eq!(response, Some(Response::Line { len: 14 }));
    assert_eq!(sink, b"RIGOL,DS1104Z\n".to_vec());
}

#[test]
fn raw_command_without_query_reads_nothing() {
    let instrument = MockInstrument::serve(vec![Reply::None]);
    let mut client = ScpiClient::connect(instrument.addr()).unwrap();

    let mut sink = Vec::new();
    let response = client.raw(":TRIGger:STATe RUN", &mut sink).unwrap();

    assert_eq!(response, None);
    assert!(sink.is_empty());
    drop(client);
    assert_eq!(instrument.finish(), vec![":TRIGger:STATe RUN \n".to_string()]);
}

#[test]
fn waveform_csv_negotiates_ascii_then_reads_block() {
    let record = b"0.00,0.02,0.04\n".to_vec();
    let instrument = MockInstrument::serve(vec![Reply::None, Reply::Block(record.clone())]);
    let mut client = ScpiClient::connect(instrument.addr()).unwrap();

    let data = client.waveform_csv().unwrap();

    assert_eq!(&*data, &record[..]);
    drop(client);
    assert_eq!(
        instrument.finish(),
        vec![
            ":WAVeform:FORMat ASCii\n".to_string(),
            ":WAVeform:DATA? \n".to_string(),
        ]
    );
}

#[test]
fn screenshot_sends_parameters_and_reads_block() {
    let image = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a];
    let instrument = MockInstrument::serve(vec![Reply::Block(image.clone())]);
    let mut client = ScpiClient::connect(instrument.addr()).unwrap();

    let options = ScreenshotOptions {
        color: true,
        inverted: false,
        format: ImageFormat::Png,
    };
    let data = client.screenshot(options).unwrap();

    assert_eq!(&*data, &image[..]);
    drop(client);
    assert_eq!(instrument.finish(), vec![":DISP:DATA? ON,OFF,PNG\n".to_string()]);
}

#[test]
fn screenshot_accepts_empty_block() {
    let instrument = MockInstrument::serve(vec![Reply::Block(Vec::new())]);
    let mut client = ScpiClient::connect(instrument.addr()).unwrap();

    let data = client.screenshot(ScreenshotOptions::default()).unwrap();
    assert!(data.is_empty());
}

#[test]
fn screenshot_rejects_unframed_reply() {
    let instrument = MockInstrument::serve(vec![Reply::Verbatim(b"garbage\n".to_vec())]);
    let mut client = ScpiClient::connect(instrument.addr()).unwrap();

    match client.screenshot(ScreenshotOptions::default()) {
        Err(ReadError::MissingBlockMarker { got }) => assert_eq!(got, b'g'),
        other => panic!("expected MissingBlockMarker, got {:?}", other),
    }
}
