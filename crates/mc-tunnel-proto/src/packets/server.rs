//! Chat, player list, scoreboard and plugin channel packets. All are skipped.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::codec::{read_bool, read_string, skip_bytes};
use crate::error::ProtoError;

/// 0x03
pub(crate) async fn skip_chat_message<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    read_string(r).await?;
    Ok(())
}

/// 0xC9: name, online flag, ping.
pub(crate) async fn skip_player_list_item<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    read_string(r).await?;
    read_bool(r).await?;
    r.read_i16().await?;
    Ok(())
}

/// 0xCB
pub(crate) async fn skip_tab_complete<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    read_string(r).await?;
    Ok(())
}

/// 0xCC: locale, view distance, chat flags, difficulty, show cape.
pub(crate) async fn skip_client_settings<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    read_string(r).await?;
    skip_bytes(r, 4).await
}

/// 0xCE: objective name, display text, create/remove.
pub(crate) async fn skip_scoreboard_objective<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    read_string(r).await?;
    read_string(r).await?;
    r.read_i8().await?;
    Ok(())
}

/// 0xCF: item name and mode; an update (mode 0) adds objective and value.
pub(crate) async fn skip_update_score<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    read_string(r).await?;
    if r.read_i8().await? == 0 {
        read_string(r).await?;
        r.read_i32().await?;
    }
    Ok(())
}

/// 0xD0
pub(crate) async fn skip_display_scoreboard<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    r.read_i8().await?;
    read_string(r).await?;
    Ok(())
}

/// 0xD1: teams.
///
/// Modes 0 (create) and 2 (update) carry display name, prefix, suffix and
/// friendly fire. Modes 0, 3 (add players) and 4 (remove players) carry a
/// player list.
pub(crate) async fn skip_teams<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    read_string(r).await?;
    let mode = r.read_i8().await?;
    if mode == 0 || mode == 2 {
        for _ in 0..3 {
            read_string(r).await?;
        }
        r.read_i8().await?;
    }
    if matches!(mode, 0 | 3 | 4) {
        let players = r.read_i16().await?;
        for _ in 0..players {
            read_string(r).await?;
        }
    }
    Ok(())
}

/// 0xE6: ModLoaderMP payload of int, float and length-prefixed string arrays.
pub(crate) async fn skip_mod_loader<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    r.read_i32().await?;
    r.read_i32().await?;
    let ints = r.read_i32().await?;
    skip_bytes(r, ints.wrapping_mul(4)).await?;
    let floats = r.read_i32().await?;
    skip_bytes(r, floats.wrapping_mul(4)).await?;
    let strings = r.read_i32().await?;
    for _ in 0..strings {
        let len = r.read_i32().await?;
        skip_bytes(r, len).await?;
    }
    Ok(())
}

/// 0xFA: channel name and payload.
///
/// Only the low byte of the declared payload length is consumed.
pub(crate) async fn skip_plugin_message<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    read_string(r).await?;
    let len = r.read_i16().await?;
    skip_bytes(r, (len & 0xFF) as i32).await
}

#[cfg(test)]
mod tests {
    use crate::codec::write_string;
    use crate::packets::{decode_packet, id};
    use bytes::{BufMut, BytesMut};

    async fn remaining_after(packet_id: u8, body: &[u8]) -> usize {
        let mut r = body;
        decode_packet(packet_id, &mut r, None).await.unwrap();
        r.len()
    }

    #[tokio::test]
    async fn chat_message() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "<Steve> hi");
        buf.put_u8(0x00);
        assert_eq!(remaining_after(id::CHAT_MESSAGE, &buf).await, 1);
    }

    #[tokio::test]
    async fn update_score_modes() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "Steve");
        buf.put_i8(0);
        write_string(&mut buf, "kills");
        buf.put_i32(3);
        assert_eq!(remaining_after(id::UPDATE_SCORE, &buf).await, 0);

        let mut buf = BytesMut::new();
        write_string(&mut buf, "Steve");
        buf.put_i8(1);
        assert_eq!(remaining_after(id::UPDATE_SCORE, &buf).await, 0);
    }

    #[tokio::test]
    async fn teams_by_mode() {
        // create: team info plus players
        let mut buf = BytesMut::new();
        write_string(&mut buf, "red");
        buf.put_i8(0);
        for s in ["Red", "[R]", ""] {
            write_string(&mut buf, s);
        }
        buf.put_i8(1);
        buf.put_i16(2);
        write_string(&mut buf, "a");
        write_string(&mut buf, "b");
        assert_eq!(remaining_after(id::TEAMS, &buf).await, 0);

        // remove team: name and mode only
        let mut buf = BytesMut::new();
        write_string(&mut buf, "red");
        buf.put_i8(1);
        buf.put_u8(0xEE);
        assert_eq!(remaining_after(id::TEAMS, &buf).await, 1);

        // remove players with a -1 count reads no names
        let mut buf = BytesMut::new();
        write_string(&mut buf, "red");
        buf.put_i8(4);
        buf.put_i16(-1);
        buf.put_u8(0xEE);
        assert_eq!(remaining_after(id::TEAMS, &buf).await, 1);
    }

    #[tokio::test]
    async fn mod_loader_arrays() {
        let mut buf = BytesMut::new();
        buf.put_i32(1);
        buf.put_i32(2);
        buf.put_i32(2);
        buf.put_slice(&[0u8; 8]);
        buf.put_i32(1);
        buf.put_slice(&[0u8; 4]);
        buf.put_i32(2);
        buf.put_i32(3);
        buf.put_slice(b"abc");
        buf.put_i32(0);
        assert_eq!(remaining_after(id::MOD_LOADER, &buf).await, 0);
    }

    #[tokio::test]
    async fn plugin_message_uses_low_length_byte() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "MC|Brand");
        // declared 0x0102, only 0x02 bytes follow
        buf.put_i16(0x0102);
        buf.put_slice(&[0xAA, 0xBB]);
        buf.put_u8(0xEE);
        assert_eq!(remaining_after(id::PLUGIN_MESSAGE, &buf).await, 1);
    }
}
