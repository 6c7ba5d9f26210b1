//! FunctionFS descriptor and string blobs.
//!
//! These are fixed configuration data, written to ep0 exactly once at
//! startup. The byte layout must match what the kernel expects: a v2
//! descriptor block carrying full-speed and high-speed descriptor sets
//! (one vendor-specific interface with two bulk endpoints each), followed
//! by a string block with one en-US interface name.
//!
//! Everything is encoded explicitly into byte buffers with little-endian
//! multi-byte fields, never through in-memory struct layout.

use bytes::{BufMut, Bytes, BytesMut};

// FunctionFS header magics.
const DESCRIPTORS_MAGIC_V2: u32 = 3;
const STRINGS_MAGIC: u32 = 2;

// Descriptor block flags: which speed-specific sets are present.
const HAS_FS_DESC: u32 = 1;
const HAS_HS_DESC: u32 = 2;

// USB descriptor constants.
const USB_DT_INTERFACE: u8 = 0x04;
const USB_DT_ENDPOINT: u8 = 0x05;
const USB_CLASS_VENDOR_SPEC: u8 = 0xFF;
const USB_ENDPOINT_XFER_BULK: u8 = 0x02;
const USB_DIR_IN: u8 = 0x80;

const INTERFACE_DESC_SIZE: usize = 9;
const ENDPOINT_DESC_SIZE: usize = 7;

/// Bulk endpoint addresses: index 1 device-to-host, index 2 host-to-device.
const EP_IN_ADDRESS: u8 = 1 | USB_DIR_IN;
const EP_OUT_ADDRESS: u8 = 2;

/// Max packet size for the high-speed endpoints. Full speed leaves it
/// unspecified and lets the kernel pick.
const HS_BULK_MAX_PACKET: u16 = 512;

/// Interface name reported to the host.
pub const INTERFACE_STRING: &str = "loop input to output";

/// en-US language code for the string table.
const LANG_EN_US: u16 = 0x0409;

/// One speed-specific descriptor set: interface + two bulk endpoints.
const DESC_SET_SIZE: usize = INTERFACE_DESC_SIZE + 2 * ENDPOINT_DESC_SIZE;

/// Total size of the descriptor blob:
/// v2 header (magic, length, flags) + fs/hs counts + two descriptor sets.
pub const DESCRIPTORS_SIZE: usize = 12 + 8 + 2 * DESC_SET_SIZE;

/// Total size of the string blob:
/// header (magic, length, str_count, lang_count) + language code + name.
pub const STRINGS_SIZE: usize = 16 + 2 + INTERFACE_STRING.len() + 1;

/// Build the descriptor blob.
pub fn descriptors() -> Bytes {
    let mut buf = BytesMut::with_capacity(DESCRIPTORS_SIZE);

    // struct usb_functionfs_descs_head_v2
    buf.put_u32_le(DESCRIPTORS_MAGIC_V2);
    buf.put_u32_le(DESCRIPTORS_SIZE as u32);
    buf.put_u32_le(HAS_FS_DESC | HAS_HS_DESC);

    // Three descriptors per speed.
    buf.put_u32_le(3); // fs_count
    buf.put_u32_le(3); // hs_count

    put_desc_set(&mut buf, 0); // full speed, max packet unspecified
    put_desc_set(&mut buf, HS_BULK_MAX_PACKET); // high speed

    debug_assert_eq!(buf.len(), DESCRIPTORS_SIZE);
    buf.freeze()
}

/// Build the string blob.
pub fn strings() -> Bytes {
    let mut buf = BytesMut::with_capacity(STRINGS_SIZE);

    // struct usb_functionfs_strings_head
    buf.put_u32_le(STRINGS_MAGIC);
    buf.put_u32_le(STRINGS_SIZE as u32);
    buf.put_u32_le(1); // str_count
    buf.put_u32_le(1); // lang_count

    buf.put_u16_le(LANG_EN_US);
    buf.put_slice(INTERFACE_STRING.as_bytes());
    buf.put_u8(0);

    debug_assert_eq!(buf.len(), STRINGS_SIZE);
    buf.freeze()
}

fn put_desc_set(buf: &mut BytesMut, max_packet: u16) {
    // Interface descriptor: one vendor-specific interface, two endpoints,
    // iInterface pointing at the single string table entry.
    buf.put_u8(INTERFACE_DESC_SIZE as u8);
    buf.put_u8(USB_DT_INTERFACE);
    buf.put_u8(0); // bInterfaceNumber
    buf.put_u8(0); // bAlternateSetting
    buf.put_u8(2); // bNumEndpoints
    buf.put_u8(USB_CLASS_VENDOR_SPEC);
    buf.put_u8(0); // bInterfaceSubClass
    buf.put_u8(0); // bInterfaceProtocol
    buf.put_u8(1); // iInterface

    put_bulk_endpoint(buf, EP_IN_ADDRESS, max_packet);
    put_bulk_endpoint(buf, EP_OUT_ADDRESS, max_packet);
}

fn put_bulk_endpoint(buf: &mut BytesMut, address: u8, max_packet: u16) {
    // Endpoint descriptor without audio fields.
    buf.put_u8(ENDPOINT_DESC_SIZE as u8);
    buf.put_u8(USB_DT_ENDPOINT);
    buf.put_u8(address);
    buf.put_u8(USB_ENDPOINT_XFER_BULK);
    buf.put_u16_le(max_packet);
    buf.put_u8(0); // bInterval
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_blob_size_and_header() {
        let blob = descriptors();
        assert_eq!(blob.len(), 66);
        assert_eq!(blob.len(), DESCRIPTORS_SIZE);

        // magic, length, flags
        assert_eq!(&blob[0..4], &3u32.to_le_bytes());
        assert_eq!(&blob[4..8], &(blob.len() as u32).to_le_bytes());
        assert_eq!(&blob[8..12], &3u32.to_le_bytes());

        // fs_count and hs_count
        assert_eq!(&blob[12..16], &3u32.to_le_bytes());
        assert_eq!(&blob[16..20], &3u32.to_le_bytes());
    }

    #[test]
    fn test_descriptor_sets_layout() {
        let blob = descriptors();
        let fs = &blob[20..20 + DESC_SET_SIZE];
        let hs = &blob[20 + DESC_SET_SIZE..];

        for set in [fs, hs] {
            // Interface descriptor.
            assert_eq!(set[0], 9);
            assert_eq!(set[1], USB_DT_INTERFACE);
            assert_eq!(set[4], 2); // bNumEndpoints
            assert_eq!(set[5], USB_CLASS_VENDOR_SPEC);
            assert_eq!(set[8], 1); // iInterface

            // Bulk in, then bulk out.
            assert_eq!(set[9], 7);
            assert_eq!(set[10], USB_DT_ENDPOINT);
            assert_eq!(set[11], 0x81);
            assert_eq!(set[12], USB_ENDPOINT_XFER_BULK);
            assert_eq!(set[16], 7);
            assert_eq!(set[18], 0x02);
        }

        // Full speed leaves max packet unspecified, high speed says 512.
        assert_eq!(u16::from_le_bytes([fs[13], fs[14]]), 0);
        assert_eq!(u16::from_le_bytes([hs[13], hs[14]]), 512);
    }

    #[test]
    fn test_string_blob_layout() {
        let blob = strings();
        assert_eq!(blob.len(), 39);
        assert_eq!(blob.len(), STRINGS_SIZE);

        assert_eq!(&blob[0..4], &2u32.to_le_bytes());
        assert_eq!(&blob[4..8], &(blob.len() as u32).to_le_bytes());
        assert_eq!(&blob[8..12], &1u32.to_le_bytes());
        assert_eq!(&blob[12..16], &1u32.to_le_bytes());

        assert_eq!(u16::from_le_bytes([blob[16], blob[17]]), 0x0409);
        assert_eq!(&blob[18..38], INTERFACE_STRING.as_bytes());
        assert_eq!(blob[38], 0); // NUL terminator
    }
}
