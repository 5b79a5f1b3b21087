use super::*;

#[test]
fn test_encode_wav_header() {
    let wav = encode_wav_pcm16(&[1, 0, 2, 0, 3], 24_000);

    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(u32::from_le_bytes([wav[4], wav[5], wav[6], wav[7]]), 36 + 4);
    assert_eq!(&wav[8..12], b"WAVE");
    assert_eq!(&wav[12..16], b"fmt ");
    assert_eq!(u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]), 24_000);
    assert_eq!(u32::from_le_bytes([wav[28], wav[29], wav[30], wav[31]]), 48_000);
    assert_eq!(&wav[36..40], b"data");
    assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 4);
    assert_eq!(&wav[44..], &[1, 0, 2, 0]);
}

#[tokio::test]
async fn test_wav_file_voice() {
    let dir = std::env::temp_dir().join(format!("pychat-voice-{}", uuid::Uuid::new_v4()));
    let voice = WavFileVoice::new(dir.to_string_lossy());

    assert!(voice.listen().await.is_err());

    let path = voice
        .play(&[0, 0, 1, 0])
        .await
        .expect("Failed to write speech")
        .expect("No file written");
    assert!(path.starts_with(&dir));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("wav"));

    let content = std::fs::read(&path).expect("Failed to read speech");
    assert_eq!(content.len(), 48);
    std::fs::remove_dir_all(&dir).ok();
}
