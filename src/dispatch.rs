use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter, SeekFrom};
use std::path::Path;

use crate::id3v1;
use crate::id3v2;
use crate::id3v2::structure::TagInfo;
use crate::id3v2::TagContainer;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagStatus {
    pub id3v1: bool,
    pub id3v2: bool,
}

/// Which tags `input` carries: ID3v2 at the very start, ID3v1 in the last
/// 128 bytes. Inputs shorter than 128 bytes are an IO error.
pub fn determine_tag_status<T: Read + Seek>(input: &mut T) -> Result<TagStatus, Error> {
    let len = input.seek(SeekFrom::End(0))?;
    if len < id3v1::TRAILER_LEN {
        return Err(Error::IOError(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("Input has {} bytes, tag detection needs 128", len),
        )));
    }

    input.seek(SeekFrom::Start(0))?;
    let mut arr: [u8; 3] = [0; 3];
    input.read_exact(&mut arr)?;

    Ok(TagStatus {
        id3v2: &arr == b"ID3",
        id3v1: id3v1::has_id3v1(input)?,
    })
}

pub fn read_tag<P: AsRef<Path>>(path: P) -> Result<TagInfo, Error> {
    let mut file = BufReader::new(File::open(path)?);
    id3v2::read(&mut file)
}

/// Replaces the ID3v2 tag of the file at `path`. The new file is built next
/// to it and only renamed over the original once complete.
pub fn write_tag<P: AsRef<Path>>(path: P, container: &TagContainer) -> Result<(), Error> {
    let path = path.as_ref();

    let tmp_path = {
        let mut p = path.to_path_buf();
        let mut e = std::ffi::OsString::from(p.extension().unwrap_or_default());
        e.push("tmp");
        p.set_extension(e);
        p
    };

    {
        let mut file = BufReader::new(File::open(path)?);
        // create temporary file to write to
        let mut tmp_file = BufWriter::new(File::create(&tmp_path)?);

        if let Err(x) = id3v2::write(container, &mut file, &mut tmp_file) {
            // on failure, delete temporary file
            drop(tmp_file);
            std::fs::remove_file(&tmp_path)?;
            return Err(x);
        }
    }

    // replace original file
    std::fs::rename(tmp_path, path)?;
    Ok(())
}
