//! Packet definitions and the client-bound dispatch table.
//!
//! Every identifier the server may send in protocol 78 has an entry here.
//! Packets the tunnel acts on decode into typed structs, the rest are
//! consumed field by field and discarded. An identifier without an entry is
//! a hard error: its length is unknown and the stream cannot be realigned.

pub mod entity;
pub mod login;
pub mod player;
pub mod server;
pub mod window;
pub mod world;

pub use login::{
    ClientStatus, EncryptionKeyRequest, EncryptionKeyResponse, Handshake, LoginRequest,
};
pub use player::{Disconnect, KeepAlive, PlayerPosition, PlayerPositionLook, Respawn, UpdateHealth};

use tokio::io::AsyncRead;
use tracing::trace;

use crate::codec::{skip_bytes, ProtoDecode};
use crate::error::ProtoError;

/// Packet IDs.
pub mod id {
    pub const KEEP_ALIVE: u8 = 0x00;
    pub const LOGIN_REQUEST: u8 = 0x01;
    pub const HANDSHAKE: u8 = 0x02;
    pub const CHAT_MESSAGE: u8 = 0x03;
    pub const TIME_UPDATE: u8 = 0x04;
    pub const ENTITY_EQUIPMENT: u8 = 0x05;
    pub const SPAWN_POSITION: u8 = 0x06;
    pub const USE_ENTITY: u8 = 0x07;
    pub const UPDATE_HEALTH: u8 = 0x08;
    pub const RESPAWN: u8 = 0x09;
    pub const PLAYER: u8 = 0x0A;
    pub const PLAYER_POSITION: u8 = 0x0B;
    pub const PLAYER_LOOK: u8 = 0x0C;
    pub const PLAYER_POSITION_LOOK: u8 = 0x0D;
    pub const PLAYER_DIGGING: u8 = 0x0E;
    pub const PLAYER_BLOCK_PLACEMENT: u8 = 0x0F;
    pub const HELD_ITEM_CHANGE: u8 = 0x10;
    pub const USE_BED: u8 = 0x11;
    pub const ANIMATION: u8 = 0x12;
    pub const ENTITY_ACTION: u8 = 0x13;
    pub const NAMED_ENTITY_SPAWN: u8 = 0x14;
    pub const COLLECT_ITEM: u8 = 0x16;
    pub const SPAWN_OBJECT: u8 = 0x17;
    pub const SPAWN_MOB: u8 = 0x18;
    pub const SPAWN_PAINTING: u8 = 0x19;
    pub const SPAWN_EXPERIENCE_ORB: u8 = 0x1A;
    pub const STEER_VEHICLE: u8 = 0x1B;
    pub const ENTITY_VELOCITY: u8 = 0x1C;
    pub const DESTROY_ENTITY: u8 = 0x1D;
    pub const ENTITY: u8 = 0x1E;
    pub const ENTITY_RELATIVE_MOVE: u8 = 0x1F;
    pub const ENTITY_LOOK: u8 = 0x20;
    pub const ENTITY_LOOK_RELATIVE_MOVE: u8 = 0x21;
    pub const ENTITY_TELEPORT: u8 = 0x22;
    pub const ENTITY_HEAD_LOOK: u8 = 0x23;
    pub const ENTITY_STATUS: u8 = 0x26;
    pub const ATTACH_ENTITY: u8 = 0x27;
    pub const ENTITY_METADATA: u8 = 0x28;
    pub const ENTITY_EFFECT: u8 = 0x29;
    pub const REMOVE_ENTITY_EFFECT: u8 = 0x2A;
    pub const SET_EXPERIENCE: u8 = 0x2B;
    pub const ENTITY_PROPERTIES: u8 = 0x2C;
    pub const MAP_CHUNK: u8 = 0x33;
    pub const MULTI_BLOCK_CHANGE: u8 = 0x34;
    pub const BLOCK_CHANGE: u8 = 0x35;
    pub const BLOCK_ACTION: u8 = 0x36;
    pub const BLOCK_BREAK_ANIMATION: u8 = 0x37;
    pub const MAP_CHUNK_BULK: u8 = 0x38;
    pub const EXPLOSION: u8 = 0x3C;
    pub const SOUND_OR_PARTICLE_EFFECT: u8 = 0x3D;
    pub const NAMED_SOUND_EFFECT: u8 = 0x3E;
    pub const CHANGE_GAME_STATE: u8 = 0x46;
    pub const SPAWN_GLOBAL_ENTITY: u8 = 0x47;
    pub const OPEN_WINDOW: u8 = 0x64;
    pub const CLOSE_WINDOW: u8 = 0x65;
    pub const CLICK_WINDOW: u8 = 0x66;
    pub const SET_SLOT: u8 = 0x67;
    pub const SET_WINDOW_ITEMS: u8 = 0x68;
    pub const UPDATE_WINDOW_PROPERTY: u8 = 0x69;
    pub const CONFIRM_TRANSACTION: u8 = 0x6A;
    pub const CREATIVE_INVENTORY_ACTION: u8 = 0x6B;
    pub const ENCHANT_ITEM: u8 = 0x6C;
    pub const UPDATE_SIGN: u8 = 0x82;
    pub const ITEM_DATA: u8 = 0x83;
    pub const UPDATE_TILE_ENTITY: u8 = 0x84;
    pub const TILE_EDITOR_OPEN: u8 = 0x85;
    pub const INCREMENT_STATISTIC: u8 = 0xC8;
    pub const PLAYER_LIST_ITEM: u8 = 0xC9;
    pub const PLAYER_ABILITIES: u8 = 0xCA;
    pub const TAB_COMPLETE: u8 = 0xCB;
    pub const CLIENT_SETTINGS: u8 = 0xCC;
    pub const CLIENT_STATUS: u8 = 0xCD;
    pub const SCOREBOARD_OBJECTIVE: u8 = 0xCE;
    pub const UPDATE_SCORE: u8 = 0xCF;
    pub const DISPLAY_SCOREBOARD: u8 = 0xD0;
    pub const TEAMS: u8 = 0xD1;
    pub const MOD_LOADER: u8 = 0xE6;
    pub const PLUGIN_MESSAGE: u8 = 0xFA;
    pub const ENCRYPTION_KEY_RESPONSE: u8 = 0xFC;
    pub const ENCRYPTION_KEY_REQUEST: u8 = 0xFD;
    pub const SERVER_LIST_PING: u8 = 0xFE;
    pub const DISCONNECT: u8 = 0xFF;
}

/// Target protocol version (Minecraft 1.6.4).
pub const PROTOCOL_VERSION: u8 = 78;

/// A decoded client-bound packet.
#[derive(Debug, Clone)]
pub enum ClientboundPacket {
    KeepAlive(KeepAlive),
    LoginRequest(LoginRequest),
    UpdateHealth(UpdateHealth),
    Respawn(Respawn),
    PlayerPosition(PlayerPosition),
    PlayerPositionLook(PlayerPositionLook),
    EncryptionKeyResponse(EncryptionKeyResponse),
    EncryptionKeyRequest(EncryptionKeyRequest),
    Disconnect(Disconnect),
    /// Consumed to keep the stream aligned; contents discarded.
    Ignored(u8),
}

impl ClientboundPacket {
    pub fn id(&self) -> u8 {
        match self {
            ClientboundPacket::KeepAlive(_) => id::KEEP_ALIVE,
            ClientboundPacket::LoginRequest(_) => id::LOGIN_REQUEST,
            ClientboundPacket::UpdateHealth(_) => id::UPDATE_HEALTH,
            ClientboundPacket::Respawn(_) => id::RESPAWN,
            ClientboundPacket::PlayerPosition(_) => id::PLAYER_POSITION,
            ClientboundPacket::PlayerPositionLook(_) => id::PLAYER_POSITION_LOOK,
            ClientboundPacket::EncryptionKeyResponse(_) => id::ENCRYPTION_KEY_RESPONSE,
            ClientboundPacket::EncryptionKeyRequest(_) => id::ENCRYPTION_KEY_REQUEST,
            ClientboundPacket::Disconnect(_) => id::DISCONNECT,
            ClientboundPacket::Ignored(id) => *id,
        }
    }
}

/// Body length of packets whose layout has no length or count fields.
pub fn fixed_body_length(packet_id: u8) -> Option<i32> {
    let len = match packet_id {
        id::TIME_UPDATE => 16,
        id::SPAWN_POSITION => 12,
        id::USE_ENTITY => 9,
        id::PLAYER => 1,
        id::PLAYER_LOOK => 9,
        id::PLAYER_DIGGING => 11,
        id::HELD_ITEM_CHANGE => 2,
        id::USE_BED => 14,
        id::ANIMATION => 5,
        id::ENTITY_ACTION => 9,
        id::COLLECT_ITEM => 8,
        id::SPAWN_EXPERIENCE_ORB => 18,
        id::STEER_VEHICLE => 10,
        id::ENTITY_VELOCITY => 10,
        id::ENTITY => 4,
        id::ENTITY_RELATIVE_MOVE => 7,
        id::ENTITY_LOOK => 6,
        id::ENTITY_LOOK_RELATIVE_MOVE => 9,
        id::ENTITY_TELEPORT => 18,
        id::ENTITY_HEAD_LOOK => 5,
        id::ENTITY_STATUS => 5,
        id::ATTACH_ENTITY => 9,
        id::ENTITY_EFFECT => 8,
        id::REMOVE_ENTITY_EFFECT => 5,
        id::SET_EXPERIENCE => 8,
        id::BLOCK_CHANGE => 12,
        id::BLOCK_ACTION => 13,
        id::BLOCK_BREAK_ANIMATION => 17,
        id::SOUND_OR_PARTICLE_EFFECT => 18,
        id::CHANGE_GAME_STATE => 2,
        id::SPAWN_GLOBAL_ENTITY => 17,
        id::CLOSE_WINDOW => 1,
        id::UPDATE_WINDOW_PROPERTY => 5,
        id::CONFIRM_TRANSACTION => 4,
        id::ENCHANT_ITEM => 2,
        id::TILE_EDITOR_OPEN => 13,
        id::INCREMENT_STATISTIC => 8,
        id::PLAYER_ABILITIES => 9,
        id::CLIENT_STATUS => 1,
        id::SERVER_LIST_PING => 0,
        _ => return None,
    };
    Some(len)
}

/// Decode the body of packet `packet_id`, whose id byte has already been read.
///
/// `previous` is the id of the last packet decoded on this stream and is only
/// used to describe an unknown id.
pub async fn decode_packet<R>(
    packet_id: u8,
    r: &mut R,
    previous: Option<u8>,
) -> Result<ClientboundPacket, ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    trace!("Packet 0x{packet_id:02x}");

    if let Some(len) = fixed_body_length(packet_id) {
        skip_bytes(r, len).await?;
        return Ok(ClientboundPacket::Ignored(packet_id));
    }

    let packet = match packet_id {
        id::KEEP_ALIVE => ClientboundPacket::KeepAlive(KeepAlive::proto_decode(r).await?),
        id::LOGIN_REQUEST => ClientboundPacket::LoginRequest(LoginRequest::proto_decode(r).await?),
        id::UPDATE_HEALTH => ClientboundPacket::UpdateHealth(UpdateHealth::proto_decode(r).await?),
        id::RESPAWN => ClientboundPacket::Respawn(Respawn::proto_decode(r).await?),
        id::PLAYER_POSITION => {
            ClientboundPacket::PlayerPosition(PlayerPosition::proto_decode(r).await?)
        }
        id::PLAYER_POSITION_LOOK => {
            ClientboundPacket::PlayerPositionLook(PlayerPositionLook::proto_decode(r).await?)
        }
        id::ENCRYPTION_KEY_RESPONSE => {
            ClientboundPacket::EncryptionKeyResponse(EncryptionKeyResponse::proto_decode(r).await?)
        }
        id::ENCRYPTION_KEY_REQUEST => {
            ClientboundPacket::EncryptionKeyRequest(EncryptionKeyRequest::proto_decode(r).await?)
        }
        id::DISCONNECT => ClientboundPacket::Disconnect(Disconnect::proto_decode(r).await?),
        _ => {
            skip_variable_body(packet_id, r, previous).await?;
            ClientboundPacket::Ignored(packet_id)
        }
    };
    Ok(packet)
}

async fn skip_variable_body<R>(
    packet_id: u8,
    r: &mut R,
    previous: Option<u8>,
) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    match packet_id {
        id::CHAT_MESSAGE => server::skip_chat_message(r).await,
        id::ENTITY_EQUIPMENT => entity::skip_entity_equipment(r).await,
        id::PLAYER_BLOCK_PLACEMENT => player::skip_block_placement(r).await,
        id::NAMED_ENTITY_SPAWN => entity::skip_named_entity_spawn(r).await,
        id::SPAWN_OBJECT => entity::skip_spawn_object(r).await,
        id::SPAWN_MOB => entity::skip_spawn_mob(r).await,
        id::SPAWN_PAINTING => entity::skip_spawn_painting(r).await,
        id::DESTROY_ENTITY => entity::skip_destroy_entity(r).await,
        id::ENTITY_METADATA => entity::skip_entity_metadata(r).await,
        id::ENTITY_PROPERTIES => entity::skip_entity_properties(r).await,
        id::MAP_CHUNK => world::skip_map_chunk(r).await,
        id::MULTI_BLOCK_CHANGE => world::skip_multi_block_change(r).await,
        id::MAP_CHUNK_BULK => world::skip_map_chunk_bulk(r).await,
        id::EXPLOSION => world::skip_explosion(r).await,
        id::NAMED_SOUND_EFFECT => world::skip_named_sound_effect(r).await,
        id::OPEN_WINDOW => window::skip_open_window(r).await,
        id::CLICK_WINDOW => window::skip_click_window(r).await,
        id::SET_SLOT => window::skip_set_slot(r).await,
        id::SET_WINDOW_ITEMS => window::skip_set_window_items(r).await,
        id::CREATIVE_INVENTORY_ACTION => window::skip_creative_inventory_action(r).await,
        id::UPDATE_SIGN => window::skip_update_sign(r).await,
        id::ITEM_DATA => window::skip_item_data(r).await,
        id::UPDATE_TILE_ENTITY => window::skip_update_tile_entity(r).await,
        id::PLAYER_LIST_ITEM => server::skip_player_list_item(r).await,
        id::TAB_COMPLETE => server::skip_tab_complete(r).await,
        id::CLIENT_SETTINGS => server::skip_client_settings(r).await,
        id::SCOREBOARD_OBJECTIVE => server::skip_scoreboard_objective(r).await,
        id::UPDATE_SCORE => server::skip_update_score(r).await,
        id::DISPLAY_SCOREBOARD => server::skip_display_scoreboard(r).await,
        id::TEAMS => server::skip_teams(r).await,
        id::MOD_LOADER => server::skip_mod_loader(r).await,
        id::PLUGIN_MESSAGE => server::skip_plugin_message(r).await,
        _ => Err(ProtoError::UnknownPacketId {
            id: packet_id,
            previous,
        }),
    }
}
