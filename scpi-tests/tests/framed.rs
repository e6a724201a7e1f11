//! Exercises the `tokio` feature of `scpi-protocol` end to end.
use futures_util::{SinkExt, StreamExt};
use scpi_protocol::TmcBlock;
use scpi_protocol::codec::TmcBlockCodec;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::codec::{FramedRead, FramedWrite};

#[tokio::test]
async fn framed_read_decodes_consecutive_blocks() {
    let (mut tx, rx) = tokio::io::duplex(64);
    let mut framed = FramedRead::new(rx, TmcBlockCodec);

    tx.write_all(b"#15hello#0").await.unwrap();

    let first = framed.next().await.unwrap().unwrap();
    assert_eq!(&first[..], b"hello");
    let second = framed.next().await.unwrap().unwrap();
    assert!(second.is_empty());
}

#[tokio::test]
async fn framed_write_encodes_blocks() {
    let (tx, mut rx) = tokio::io::duplex(64);
    let mut framed = FramedWrite::new(tx, TmcBlockCodec);

    framed.send(TmcBlock::new(b"data".to_vec())).await.unwrap();
    drop(framed);

    let mut wire = Vec::new();
    rx.read_to_end(&mut wire).await.unwrap();
    assert_eq!(wire, b"#14data".to_vec());
}
