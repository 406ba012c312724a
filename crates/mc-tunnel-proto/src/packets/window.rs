//! Window, inventory and tile entity packets. All are skipped.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::codec::{read_bool, read_string, skip_bytes};
use crate::error::ProtoError;
use crate::item_stack::skip_slot;

/// Inventory type of a horse window, which carries an extra entity id.
const HORSE_INVENTORY: i8 = 11;

/// 0x64
pub(crate) async fn skip_open_window<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    r.read_i8().await?;
    let inventory_type = r.read_i8().await?;
    read_string(r).await?;
    r.read_i8().await?;
    read_bool(r).await?;
    if inventory_type == HORSE_INVENTORY {
        r.read_i32().await?;
    }
    Ok(())
}

/// 0x66
pub(crate) async fn skip_click_window<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    skip_bytes(r, 1 + 2 + 1 + 2 + 1).await?;
    skip_slot(r).await
}

/// 0x67
pub(crate) async fn skip_set_slot<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    r.read_i8().await?;
    r.read_i16().await?;
    skip_slot(r).await
}

/// 0x68
pub(crate) async fn skip_set_window_items<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    r.read_i8().await?;
    let count = r.read_i16().await?;
    for _ in 0..count {
        skip_slot(r).await?;
    }
    Ok(())
}

/// 0x6B
pub(crate) async fn skip_creative_inventory_action<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    r.read_i16().await?;
    skip_slot(r).await
}

/// 0x82: block position and four text lines.
pub(crate) async fn skip_update_sign<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    skip_bytes(r, 4 + 2 + 4).await?;
    for _ in 0..4 {
        read_string(r).await?;
    }
    Ok(())
}

/// 0x83: map item data.
pub(crate) async fn skip_item_data<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    r.read_i16().await?;
    r.read_i16().await?;
    let len = r.read_i16().await?;
    skip_bytes(r, len as i32).await
}

/// 0x84: tile entity position, action and optional NBT.
pub(crate) async fn skip_update_tile_entity<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    skip_bytes(r, 4 + 2 + 4 + 1).await?;
    let len = r.read_i16().await?;
    skip_bytes(r, len as i32).await
}
