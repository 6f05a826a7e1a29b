use serde::{Deserialize, Serialize};

/// Symbolic icon kinds a waypoint entry can declare.
///
/// The source document names these with legacy upper-snake tags
/// (`ENDER_PEARL`, `PLAYER_HEAD`, ...). Unknown tags fall back to
/// [`ItemKind::EnderPearl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ItemKind {
    #[default]
    EnderPearl,
    PlayerHead,
    WhiteBanner,
    Compass,
    Map,
    Book,
    Paper,
    GrassBlock,
    Stone,
    Cobblestone,
    Sand,
    Netherrack,
    EndStone,
    Obsidian,
    Glowstone,
    SeaLantern,
    DiamondBlock,
    EmeraldBlock,
    GoldBlock,
    IronBlock,
    Beacon,
    Chest,
    EnderChest,
    CraftingTable,
    Furnace,
    Anvil,
    EnchantingTable,
    Bed,
    OakSapling,
    OakDoor,
    Ladder,
    Torch,
    Lever,
    NetherStar,
    EnderEye,
    BlazeRod,
    Snowball,
}

impl ItemKind {
    /// Resolve a symbolic tag from the source document, case-insensitively.
    pub fn match_name(tag: &str) -> Option<Self> {
        let kind = match tag.to_ascii_uppercase().as_str() {
            "ENDER_PEARL" => ItemKind::EnderPearl,
            "PLAYER_HEAD" | "SKULL_ITEM" => ItemKind::PlayerHead,
            "WHITE_BANNER" | "BANNER" => ItemKind::WhiteBanner,
            "COMPASS" => ItemKind::Compass,
            "MAP" | "FILLED_MAP" => ItemKind::Map,
            "BOOK" | "WRITTEN_BOOK" => ItemKind::Book,
            "PAPER" => ItemKind::Paper,
            "GRASS_BLOCK" | "GRASS" => ItemKind::GrassBlock,
            "STONE" => ItemKind::Stone,
            "COBBLESTONE" => ItemKind::Cobblestone,
            "SAND" => ItemKind::Sand,
            "NETHERRACK" => ItemKind::Netherrack,
            "END_STONE" => ItemKind::EndStone,
            "OBSIDIAN" => ItemKind::Obsidian,
            "GLOWSTONE" => ItemKind::Glowstone,
            "SEA_LANTERN" => ItemKind::SeaLantern,
            "DIAMOND_BLOCK" => ItemKind::DiamondBlock,
            "EMERALD_BLOCK" => ItemKind::EmeraldBlock,
            "GOLD_BLOCK" => ItemKind::GoldBlock,
            "IRON_BLOCK" => ItemKind::IronBlock,
            "BEACON" => ItemKind::Beacon,
            "CHEST" => ItemKind::Chest,
            "ENDER_CHEST" => ItemKind::EnderChest,
            "CRAFTING_TABLE" | "WORKBENCH" => ItemKind::CraftingTable,
            "FURNACE" => ItemKind::Furnace,
            "ANVIL" => ItemKind::Anvil,
            "ENCHANTING_TABLE" | "ENCHANTMENT_TABLE" => ItemKind::EnchantingTable,
            "RED_BED" | "BED" => ItemKind::Bed,
            "OAK_SAPLING" | "SAPLING" => ItemKind::OakSapling,
            "OAK_DOOR" | "WOODEN_DOOR" => ItemKind::OakDoor,
            "LADDER" => ItemKind::Ladder,
            "TORCH" => ItemKind::Torch,
            "LEVER" => ItemKind::Lever,
            "NETHER_STAR" => ItemKind::NetherStar,
            "ENDER_EYE" | "EYE_OF_ENDER" => ItemKind::EnderEye,
            "BLAZE_ROD" => ItemKind::BlazeRod,
            "SNOWBALL" | "SNOW_BALL" => ItemKind::Snowball,
            _ => return None,
        };
        Some(kind)
    }
}

/// The 16 recognized banner layer colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DyeColor {
    White,
    Orange,
    Magenta,
    LightBlue,
    Yellow,
    Lime,
    Pink,
    Gray,
    LightGray,
    Cyan,
    Purple,
    Blue,
    Brown,
    Green,
    Red,
    Black,
}

impl DyeColor {
    /// Resolve a color from the source document, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.to_ascii_uppercase().as_str() {
            "WHITE" => DyeColor::White,
            "ORANGE" => DyeColor::Orange,
            "MAGENTA" => DyeColor::Magenta,
            "LIGHT_BLUE" => DyeColor::LightBlue,
            "YELLOW" => DyeColor::Yellow,
            "LIME" => DyeColor::Lime,
            "PINK" => DyeColor::Pink,
            "GRAY" => DyeColor::Gray,
            "LIGHT_GRAY" => DyeColor::LightGray,
            "CYAN" => DyeColor::Cyan,
            "PURPLE" => DyeColor::Purple,
            "BLUE" => DyeColor::Blue,
            "BROWN" => DyeColor::Brown,
            "GREEN" => DyeColor::Green,
            "RED" => DyeColor::Red,
            "BLACK" => DyeColor::Black,
            _ => return None,
        };
        Some(color)
    }
}

/// A banner pattern recognized by a [`PatternRegistry`](crate::catalog::PatternRegistry).
///
/// Holds the canonical (post-translation) pattern identifier. Constructed
/// only by a registry, so holding one means the identifier resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerPattern(String);

impl BannerPattern {
    pub(crate) fn new(canonical_id: impl Into<String>) -> Self {
        Self(canonical_id.into())
    }

    /// Canonical pattern identifier, e.g. `"stripe_bottom"`.
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// One banner decoration layer: a recognized color plus a resolved pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerLayer {
    pub color: DyeColor,
    pub pattern: BannerPattern,
}

/// A single waypoint loaded from the catalog document.
///
/// Immutable once constructed; entries are built in bulk by the parser and
/// only replaced wholesale when the catalog reloads. `name` and
/// `destination_id` are guaranteed non-empty. `banner`, when present, is
/// guaranteed non-empty as well (an all-invalid layer list collapses to
/// `None` during parsing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Identifier from the document. Duplicates are permitted; entries are
    /// addressed by position within a snapshot, not by name.
    pub name: String,
    /// Icon kind shown for this waypoint.
    pub kind: ItemKind,
    /// Label shown to the user, may carry `&`-formatting codes.
    pub display_name: String,
    /// Description lines, may carry `&`-formatting codes.
    pub lore: Vec<String>,
    /// Target the waypoint activates. Required.
    pub destination_id: String,
    /// How many times this waypoint has been activated.
    pub performed: u32,
    /// Grouping label, empty when the document does not assign one.
    pub category: String,
    /// Head texture reference, present only when the document has the key.
    pub skull_owner: Option<String>,
    /// Banner decoration layers, `None` when absent or none resolved.
    pub banner: Option<Vec<BannerLayer>>,
}
