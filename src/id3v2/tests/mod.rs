
use std::io::Cursor;

use crate::id3v2::extended;
use crate::id3v2::structure::*;
use crate::id3v2::tools::{encode_synch_u28, stuff};
use crate::id3v2::TagContainer;
use crate::Error;

const AUDIO: &[u8] = &[0xFF, 0xFB, 0x90, 0x64, 0x00, 0x0F, 0xF0, 0x00];

fn raw(id: &str, payload: &[u8]) -> RawFrame {
    RawFrame::with_id(id, payload.to_vec(), FrameOptions::default()).unwrap()
}

fn tag_with_body(major: u8, flags: u8, body: &[u8]) -> Vec<u8> {
    let mut vec = vec![b'I', b'D', b'3', major, 0x00, flags];
    vec.extend_from_slice(&encode_synch_u28(body.len() as u32).unwrap());
    vec.extend_from_slice(body);
    vec
}

fn write_to_vec(c: &TagContainer, input: &[u8]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    super::write(c, &mut Cursor::new(input), &mut out)?;
    Ok(out)
}

fn read_vec(input: &[u8]) -> Result<TagInfo, Error> {
    super::read(&mut Cursor::new(input))
}

#[test]
fn padding_ends_frame_scan() {
    let mut body = b"1234\x00\x00\x00\x04\x00\x00IPQR".to_vec();
    body.resize(28, 0x00);
    let data = tag_with_body(3, 0x00, &body);

    let info = read_vec(&data).unwrap();
    assert_eq!(info.header.size, 28);
    assert_eq!(info.frames, vec![raw("1234", b"IPQR")]);
}

#[test]
fn header_fields() {
    let data = tag_with_body(4, 0b1010_0000, &[0; 12]);
    let info = read_vec(&data).unwrap();
    assert_eq!(info.header.version, Version::V4);
    assert_eq!(info.header.revision, 0);
    assert_eq!(
        info.header.flags,
        HeaderFlags {
            unsynchronisation: true,
            experimental: true,
            ..Default::default()
        }
    );
    assert!(info.extended_header.is_none());
    assert!(info.frames.is_empty());
}

#[test]
fn no_magic_is_header_not_found() {
    match read_vec(b"RIFF\x00\x00\x00\x00\x00\x00\x00\x00") {
        Err(Error::HeaderNotFound(_)) => (),
        other => panic!("expected header not found, got {:?}", other),
    }
    match read_vec(b"ID") {
        Err(Error::HeaderNotFound(_)) => (),
        other => panic!("expected header not found, got {:?}", other),
    }
}

#[test]
fn v22_is_unsupported() {
    let data = tag_with_body(2, 0x00, &[0; 6]);
    match read_vec(&data) {
        Err(Error::UnsupportedError(_)) => (),
        other => panic!("expected unsupported, got {:?}", other),
    }
}

#[test]
fn bad_header_flags() {
    // footer bit in a v2.3 tag
    assert!(read_vec(&tag_with_body(3, 0b0001_0000, &[0; 10])).is_err());
    assert!(read_vec(&tag_with_body(4, 0b0000_0001, &[0; 10])).is_err());
}

#[test]
fn truncated_body_is_structure_error() {
    let mut data = tag_with_body(3, 0x00, &[0; 40]);
    data.truncate(30);
    match read_vec(&data) {
        Err(Error::StructureError(_)) => (),
        other => panic!("expected structure error, got {:?}", other),
    }
}

#[test]
fn oversized_frame_is_structure_error() {
    let mut body = b"TIT2\x00\x00\x00\x30\x00\x00abc".to_vec();
    body.resize(20, 0x00);
    match read_vec(&tag_with_body(3, 0x00, &body)) {
        Err(Error::StructureError(_)) => (),
        other => panic!("expected structure error, got {:?}", other),
    }
}

#[test]
fn frame_size_encoding_per_version() {
    let payload = vec![0x41; 200];
    // 200 as plain u32 is 00 00 00 C8, as synchsafe 00 00 01 48
    let mut v3 = b"TEXT\x00\x00\x00\xC8\x00\x00".to_vec();
    v3.extend_from_slice(&payload);
    let mut v4 = b"TEXT\x00\x00\x01\x48\x00\x00".to_vec();
    v4.extend_from_slice(&payload);

    let c3 = TagContainer::new(Version::V3)
        .with_padding(0)
        .with_frame(Box::new(raw("TEXT", &payload)));
    assert_eq!(&write_to_vec(&c3, &[]).unwrap()[10..], &v3[..]);
    let c4 = TagContainer::new(Version::V4)
        .with_padding(0)
        .with_frame(Box::new(raw("TEXT", &payload)));
    assert_eq!(&write_to_vec(&c4, &[]).unwrap()[10..], &v4[..]);

    assert_eq!(read_vec(&tag_with_body(3, 0, &v3)).unwrap().frames[0].payload(), &payload[..]);
    assert_eq!(read_vec(&tag_with_body(4, 0, &v4)).unwrap().frames[0].payload(), &payload[..]);
}

fn sample_frames() -> Vec<RawFrame> {
    vec![
        RawFrame::with_id(
            "TIT2",
            b"\x00Title".to_vec(),
            FrameOptions {
                tag_alter_preservation: true,
                ..Default::default()
            },
        )
        .unwrap(),
        raw("ZZZ9", &[0xFF, 0xE0, 0xFF, 0x00, 0xFF]),
        RawFrame::with_id(
            "GRP1",
            vec![0x42; 300],
            FrameOptions {
                read_only: true,
                grouping_identity: true,
                ..Default::default()
            },
        )
        .unwrap(),
        raw("TALB", b"\x00Album"),
    ]
}

fn container(version: Version, frames: &[RawFrame]) -> TagContainer {
    frames
        .iter()
        .fold(TagContainer::new(version), |c, f| c.with_frame(Box::new(f.clone())))
}

#[test]
fn v3_round_trip() {
    let c = container(Version::V3, &sample_frames()).with_padding(64);
    let out = write_to_vec(&c, AUDIO).unwrap();
    assert_eq!(&out[0..6], b"ID3\x03\x00\x00");
    assert_eq!(&out[out.len() - AUDIO.len()..], AUDIO);

    let info = read_vec(&out).unwrap();
    assert_eq!(info.frames, sample_frames());
    assert_eq!(info.header.version, Version::V3);
}

#[test]
fn v4_round_trip_with_everything() {
    let c = container(Version::V4, &sample_frames())
        .with_unsynchronisation()
        .with_update_flag()
        .with_restrictions(0x21)
        .with_footer();
    let out = write_to_vec(&c, AUDIO).unwrap();

    let info = read_vec(&out).unwrap();
    assert_eq!(info.frames, sample_frames());
    assert_eq!(
        info.extended_header,
        Some(ExtendedHeader::V4(ExtendedHeaderV4 {
            update_tag: true,
            crc32: None,
            restriction: Some(0x21),
        }))
    );
    assert!(info.header.flags.unsynchronisation);
    assert!(info.header.flags.footer);

    // footer right after the body, then the audio
    let end = 10 + info.header.size as usize;
    assert_eq!(&out[end..end + 3], b"3DI");
    assert_eq!(&out[end + 3..end + 10], &out[3..10]);
    assert_eq!(&out[end + 10..], AUDIO);

    // nothing that looks like a sync between header and footer
    for w in out[10..end].windows(2) {
        assert!(!(w[0] == 0xFF && w[1] >= 0xE0));
    }

    // written back unchanged
    let again = write_to_vec(&TagContainer::from_info(&info), &out).unwrap();
    assert_eq!(again, out);
}

#[test]
fn v3_crc_round_trip() {
    let c = container(Version::V3, &sample_frames())
        .with_crc()
        .with_unsynchronisation()
        .with_padding(10);
    let out = write_to_vec(&c, AUDIO).unwrap();
    let info = read_vec(&out).unwrap();
    assert_eq!(info.frames, sample_frames());
    match info.extended_header {
        Some(ExtendedHeader::V3(h)) => {
            assert_eq!(h.padding_size, 10);
            assert!(h.crc_present());
        }
        other => panic!("expected v3 extended header, got {:?}", other),
    }

    let again = write_to_vec(&TagContainer::from_info(&info), &out).unwrap();
    assert_eq!(again, out);
}

#[test]
fn v3_crc_mismatch() {
    let c = TagContainer::new(Version::V3)
        .with_crc()
        .with_frame(Box::new(raw("TIT2", b"\x00Title")));
    let mut out = write_to_vec(&c, AUDIO).unwrap();
    // header, extended header with CRC, frame header, then the payload
    assert_eq!(out[35], b'T');
    out[35] = b't';
    match read_vec(&out) {
        Err(Error::ChecksumError { .. }) => (),
        other => panic!("expected checksum error, got {:?}", other),
    }
}

#[test]
fn v3_crc_value_in_extended_header() {
    let frame = b"TIT2\x00\x00\x00\x06\x00\x00\x00Title";
    let ext = extended::write_v3(&ExtendedHeaderV3 {
        padding_size: 0,
        crc32: Some(crate::id3v2::crc::calculate(frame)),
    });
    let mut body = ext.clone();
    body.extend_from_slice(frame);
    let info = read_vec(&tag_with_body(3, 0b0100_0000, &body)).unwrap();
    assert_eq!(info.frames, vec![raw("TIT2", b"\x00Title")]);
}

#[test]
fn v4_crc_is_read_but_not_written() {
    let frame = b"TIT2\x00\x00\x00\x06\x00\x00\x00Title";
    let mut body = extended::write_v4(&ExtendedHeaderV4 {
        crc32: Some(0x1234_5678),
        ..Default::default()
    })
    .unwrap();
    body.extend_from_slice(frame);
    let info = read_vec(&tag_with_body(4, 0b0100_0000, &body)).unwrap();
    assert_eq!(info.frames.len(), 1);
    match info.extended_header {
        Some(ExtendedHeader::V4(h)) => assert_eq!(h.crc32, Some(0x1234_5678)),
        other => panic!("expected v4 extended header, got {:?}", other),
    }

    let c = TagContainer::new(Version::V4).with_crc();
    match write_to_vec(&c, AUDIO) {
        Err(Error::UnsupportedError(_)) => (),
        other => panic!("expected unsupported, got {:?}", other),
    }
}

#[test]
fn preflight_rejects_before_writing() {
    use crate::id3v2::frames::TextFrame;
    use crate::id3v2::text::TextEncoding;

    let c = TagContainer::new(Version::V3).with_frame(Box::new(
        TextFrame::new("TIT2", TextEncoding::Utf8, "Title").unwrap(),
    ));
    let mut out = Vec::new();
    match super::write(&c, &mut Cursor::new(AUDIO), &mut out) {
        Err(Error::StructureError(_)) => (),
        other => panic!("expected structure error, got {:?}", other),
    }
    assert!(out.is_empty());

    let v4_only = RawFrame::with_id(
        "TIT2",
        b"\x00x".to_vec(),
        FrameOptions {
            data_length_indicator: true,
            ..Default::default()
        },
    )
    .unwrap();
    let c = TagContainer::new(Version::V3).with_frame(Box::new(v4_only));
    assert!(write_to_vec(&c, AUDIO).is_err());

    let c = TagContainer::new(Version::V3).with_frame(Box::new(RawFrame::new(
        *b"AB\x00C",
        Vec::new(),
        FrameOptions::default(),
    )));
    assert!(write_to_vec(&c, AUDIO).is_err());

    let c = TagContainer::new(Version::V3).with_footer();
    assert!(write_to_vec(&c, AUDIO).is_err());
}

#[test]
fn write_replaces_existing_tag() {
    let mut old = tag_with_body(4, 0b0001_0000, &[0; 20]);
    old.extend_from_slice(b"3DI\x04\x00\x10\x00\x00\x00\x14");
    old.extend_from_slice(AUDIO);

    let c = TagContainer::new(Version::V3)
        .with_padding(0)
        .with_frame(Box::new(raw("TIT2", b"\x00New")));
    let out = write_to_vec(&c, &old).unwrap();
    let mut expected = tag_with_body(3, 0x00, b"TIT2\x00\x00\x00\x04\x00\x00\x00New");
    expected.extend_from_slice(AUDIO);
    assert_eq!(out, expected);
}

#[test]
fn write_without_existing_tag() {
    let c = TagContainer::new(Version::V4).with_padding(4);
    let out = write_to_vec(&c, AUDIO).unwrap();
    assert_eq!(&out[..14], b"ID3\x04\x00\x00\x00\x00\x00\x04\x00\x00\x00\x00");
    assert_eq!(&out[14..], AUDIO);
}

#[test]
fn remove_tag() {
    let mut data = tag_with_body(3, 0x00, b"TIT2\x00\x00\x00\x02\x00\x00\x00A");
    data.extend_from_slice(AUDIO);
    let mut out = Vec::new();
    super::remove(&mut Cursor::new(&data), &mut out).unwrap();
    assert_eq!(out, AUDIO);

    // whatever the version
    let mut data = tag_with_body(2, 0x00, &[0; 7]);
    data.extend_from_slice(AUDIO);
    let mut out = Vec::new();
    super::remove(&mut Cursor::new(&data), &mut out).unwrap();
    assert_eq!(out, AUDIO);

    match super::remove(&mut Cursor::new(AUDIO), &mut Vec::new()) {
        Err(Error::HeaderNotFound(_)) => (),
        other => panic!("expected header not found, got {:?}", other),
    }
}

#[test]
fn unsynchronised_body_is_stripped() {
    let frame = b"ZZZ1\x00\x00\x00\x03\x00\x00\xFF\x00\xE0";
    let body = stuff(frame);
    assert_eq!(body.len(), frame.len() + 1);
    let info = read_vec(&tag_with_body(3, 0b1000_0000, &body)).unwrap();
    assert_eq!(info.frames, vec![raw("ZZZ1", &[0xFF, 0x00, 0xE0])]);
}

#[test]
fn unusual_frame_ids_survive_rewrite() {
    let mut body = b"abcd\x00\x00\x00\x02\x00\x00hi".to_vec();
    body.resize(20, 0x00);
    let mut data = tag_with_body(3, 0x00, &body);
    data.extend_from_slice(AUDIO);

    let info = read_vec(&data).unwrap();
    assert_eq!(info.frames, vec![RawFrame::new(*b"abcd", b"hi".to_vec(), FrameOptions::default())]);
    let out = write_to_vec(&TagContainer::from_info(&info), &data).unwrap();
    assert_eq!(out, data);
}

#[test]
fn rewrite_keeps_padding() {
    let c = TagContainer::new(Version::V3)
        .with_padding(7)
        .with_frame(Box::new(raw("TIT2", b"\x00Title")));
    let out = write_to_vec(&c, AUDIO).unwrap();
    assert_eq!(out.len(), 10 + 16 + 7 + AUDIO.len());

    let info = read_vec(&out).unwrap();
    assert_eq!(info.padding, 7);
    let again = write_to_vec(&TagContainer::from_info(&info), &out).unwrap();
    assert_eq!(again, out);
}

#[test]
fn experimental_flag_and_revision() {
    let c = TagContainer::new(Version::V4)
        .with_revision(2)
        .with_experimental()
        .with_padding(0);
    let out = write_to_vec(&c, AUDIO).unwrap();
    assert_eq!(&out[3..6], &[0x04, 0x02, 0b0010_0000]);

    let info = read_vec(&out).unwrap();
    assert_eq!(info.header.revision, 2);
    assert!(info.header.flags.experimental);
    assert!(!info.header.flags.extended_header);

    let c = TagContainer::new(Version::V3).with_revision(0xFF);
    match write_to_vec(&c, AUDIO) {
        Err(Error::StructureError(_)) => (),
        other => panic!("expected structure error, got {:?}", other),
    }
}

#[test]
fn bare_extended_headers() {
    let c = TagContainer::new(Version::V3)
        .with_extended_header()
        .with_padding(3);
    let out = write_to_vec(&c, AUDIO).unwrap();
    assert_eq!(out[5], 0b0100_0000);
    assert_eq!(&out[10..20], &[0, 0, 0, 6, 0, 0, 0, 0, 0, 3]);
    let info = read_vec(&out).unwrap();
    match info.extended_header {
        Some(ExtendedHeader::V3(h)) => {
            assert_eq!(h.padding_size, 3);
            assert!(!h.crc_present());
        }
        other => panic!("expected v3 extended header, got {:?}", other),
    }
    assert_eq!(info.padding, 3);

    let c = TagContainer::new(Version::V4)
        .with_extended_header()
        .with_padding(0);
    let out = write_to_vec(&c, AUDIO).unwrap();
    assert_eq!(out[5], 0b0100_0000);
    assert_eq!(&out[10..16], &[0, 0, 0, 6, 1, 0]);
    let info = read_vec(&out).unwrap();
    match info.extended_header {
        Some(ExtendedHeader::V4(h)) => {
            assert!(!h.update_tag);
            assert!(!h.crc_present());
            assert!(!h.restriction_present());
        }
        other => panic!("expected v4 extended header, got {:?}", other),
    }
}

#[test]
fn code_page_of_ansi_text() {
    use crate::id3v2::frames::TextFrame;
    use crate::id3v2::text::TextEncoding;
    use crate::tools::encoding::CodePage;

    let c = TagContainer::new(Version::V3)
        .with_code_page(CodePage(1251))
        .with_padding(0)
        .with_frame(Box::new(
            TextFrame::new("TIT2", TextEncoding::Ansi, "Привет").unwrap(),
        ));
    let out = write_to_vec(&c, AUDIO).unwrap();
    assert_eq!(&out[20..27], &[0x00, 0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2]);

    let info = read_vec(&out).unwrap();
    let frames = super::decode_frames(&info, CodePage(1251)).unwrap();
    match frames[0].as_any().downcast_ref::<TextFrame>() {
        Some(f) => assert_eq!(f.text(), "Привет"),
        None => panic!("expected a text frame, got {:?}", frames[0]),
    }
}
