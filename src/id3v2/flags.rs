//! Frame flag layouts. v2.3 and v2.4 keep the same flags in different bits.
//!
//! ```text
//!                          v2.3        v2.4
//! tag alter preservation   %a0000000   %0a000000
//! file alter preservation  %0b000000   %00b00000
//! read only                %00c00000   %000c0000
//! compression              %i0000000   %0000k000
//! encryption               %0j000000   %00000m00
//! grouping identity        %00k00000   %0h000000
//! unsynchronisation           -        %000000n0
//! data length indicator       -        %0000000p
//! ```

use crate::id3v2::structure::{FrameOptions, Version};
use crate::tools::structure_error;
use crate::Error;

const fn bit(flags: u8, n: u8) -> bool {
    flags & (1 << n) != 0
}

const fn set(on: bool, n: u8) -> u8 {
    (on as u8) << n
}

pub fn decode(flags: [u8; 2], version: Version) -> FrameOptions {
    let [status, format] = flags;
    match version {
        Version::V3 => FrameOptions {
            tag_alter_preservation: bit(status, 7),
            file_alter_preservation: bit(status, 6),
            read_only: bit(status, 5),
            compression: bit(format, 7),
            encryption: bit(format, 6),
            grouping_identity: bit(format, 5),
            unsynchronisation: false,
            data_length_indicator: false,
        },
        Version::V4 => FrameOptions {
            tag_alter_preservation: bit(status, 6),
            file_alter_preservation: bit(status, 5),
            read_only: bit(status, 4),
            grouping_identity: bit(format, 6),
            compression: bit(format, 3),
            encryption: bit(format, 2),
            unsynchronisation: bit(format, 1),
            data_length_indicator: bit(format, 0),
        },
    }
}

pub fn encode(options: FrameOptions, version: Version) -> Result<[u8; 2], Error> {
    match version {
        Version::V3 => {
            if options.unsynchronisation || options.data_length_indicator {
                return Err(structure_error(
                    "Frame unsynchronisation and data length indicator flags need ID3v2.4",
                ));
            }
            Ok([
                set(options.tag_alter_preservation, 7)
                    | set(options.file_alter_preservation, 6)
                    | set(options.read_only, 5),
                set(options.compression, 7)
                    | set(options.encryption, 6)
                    | set(options.grouping_identity, 5),
            ])
        }
        Version::V4 => Ok([
            set(options.tag_alter_preservation, 6)
                | set(options.file_alter_preservation, 5)
                | set(options.read_only, 4),
            set(options.grouping_identity, 6)
                | set(options.compression, 3)
                | set(options.encryption, 2)
                | set(options.unsynchronisation, 1)
                | set(options.data_length_indicator, 0),
        ]),
    }
}
