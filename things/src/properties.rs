use bitflags::bitflags;

/// Property stream terminator.
pub const LAST_FLAG: u8 = 0xFF;

/// One entry of the property flag table, by its byte on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PropertyFlag {
    Ground = 0x00,
    GroundBorder = 0x01,
    OnBottom = 0x02,
    OnTop = 0x03,
    Container = 0x04,
    Stackable = 0x05,
    ForceUse = 0x06,
    MultiUse = 0x07,
    Writable = 0x08,
    WritableOnce = 0x09,
    FluidContainer = 0x0A,
    Fluid = 0x0B,
    Unpassable = 0x0C,
    Unmoveable = 0x0D,
    BlockMissile = 0x0E,
    BlockPathfind = 0x0F,
    NoMoveAnimation = 0x10,
    Pickupable = 0x11,
    Hangable = 0x12,
    HookSouth = 0x13,
    HookEast = 0x14,
    Rotatable = 0x15,
    HasLight = 0x16,
    DontHide = 0x17,
    Translucent = 0x18,
    HasOffset = 0x19,
    HasElevation = 0x1A,
    LyingObject = 0x1B,
    AnimateAlways = 0x1C,
    MiniMap = 0x1D,
    LensHelp = 0x1E,
    FullGround = 0x1F,
    IgnoreLook = 0x20,
    Cloth = 0x21,
    MarketItem = 0x22,
    DefaultAction = 0x23,
    Wrappable = 0x24,
    Unwrappable = 0x25,
    TopEffect = 0x26,
    HasCharges = 0xFC,
    FloorChange = 0xFD,
    Usable = 0xFE,
}

impl PropertyFlag {
    /// Canonical write order.
    pub const ALL: [PropertyFlag; 42] = [
        Self::Ground,
        Self::GroundBorder,
        Self::OnBottom,
        Self::OnTop,
        Self::Container,
        Self::Stackable,
        Self::ForceUse,
        Self::MultiUse,
        Self::Writable,
        Self::WritableOnce,
        Self::FluidContainer,
        Self::Fluid,
        Self::Unpassable,
        Self::Unmoveable,
        Self::BlockMissile,
        Self::BlockPathfind,
        Self::NoMoveAnimation,
        Self::Pickupable,
        Self::Hangable,
        Self::HookSouth,
        Self::HookEast,
        Self::Rotatable,
        Self::HasLight,
        Self::DontHide,
        Self::Translucent,
        Self::HasOffset,
        Self::HasElevation,
        Self::LyingObject,
        Self::AnimateAlways,
        Self::MiniMap,
        Self::LensHelp,
        Self::FullGround,
        Self::IgnoreLook,
        Self::Cloth,
        Self::MarketItem,
        Self::DefaultAction,
        Self::Wrappable,
        Self::Unwrappable,
        Self::TopEffect,
        Self::HasCharges,
        Self::FloorChange,
        Self::Usable,
    ];

    pub fn from_u8(byte: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| *flag as u8 == byte)
    }

    /// The bit standing for this flag when it carries no payload.
    pub fn thing_flag(self) -> Option<ThingFlags> {
        let flag = match self {
            Self::GroundBorder => ThingFlags::GROUND_BORDER,
            Self::OnBottom => ThingFlags::ON_BOTTOM,
            Self::OnTop => ThingFlags::ON_TOP,
            Self::Container => ThingFlags::CONTAINER,
            Self::Stackable => ThingFlags::STACKABLE,
            Self::ForceUse => ThingFlags::FORCE_USE,
            Self::MultiUse => ThingFlags::MULTI_USE,
            Self::FluidContainer => ThingFlags::FLUID_CONTAINER,
            Self::Fluid => ThingFlags::FLUID,
            Self::Unpassable => ThingFlags::UNPASSABLE,
            Self::Unmoveable => ThingFlags::UNMOVEABLE,
            Self::BlockMissile => ThingFlags::BLOCK_MISSILE,
            Self::BlockPathfind => ThingFlags::BLOCK_PATHFIND,
            Self::NoMoveAnimation => ThingFlags::NO_MOVE_ANIMATION,
            Self::Pickupable => ThingFlags::PICKUPABLE,
            Self::Hangable => ThingFlags::HANGABLE,
            Self::HookSouth => ThingFlags::HOOK_SOUTH,
            Self::HookEast => ThingFlags::HOOK_EAST,
            Self::Rotatable => ThingFlags::ROTATABLE,
            Self::DontHide => ThingFlags::DONT_HIDE,
            Self::Translucent => ThingFlags::TRANSLUCENT,
            Self::LyingObject => ThingFlags::LYING_OBJECT,
            Self::AnimateAlways => ThingFlags::ANIMATE_ALWAYS,
            Self::FullGround => ThingFlags::FULL_GROUND,
            Self::IgnoreLook => ThingFlags::IGNORE_LOOK,
            Self::Wrappable => ThingFlags::WRAPPABLE,
            Self::Unwrappable => ThingFlags::UNWRAPPABLE,
            Self::TopEffect => ThingFlags::TOP_EFFECT,
            Self::HasCharges => ThingFlags::HAS_CHARGES,
            Self::FloorChange => ThingFlags::FLOOR_CHANGE,
            Self::Usable => ThingFlags::USABLE,
            Self::Ground
            | Self::Writable
            | Self::WritableOnce
            | Self::HasLight
            | Self::HasOffset
            | Self::HasElevation
            | Self::MiniMap
            | Self::LensHelp
            | Self::Cloth
            | Self::MarketItem
            | Self::DefaultAction => return None,
        };

        Some(flag)
    }
}

bitflags! {
    /// Attributes without a payload.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ThingFlags: u32 {
        const GROUND_BORDER = 1;
        const ON_BOTTOM = 1 << 1;
        const ON_TOP = 1 << 2;
        const CONTAINER = 1 << 3;
        const STACKABLE = 1 << 4;
        const FORCE_USE = 1 << 5;
        const MULTI_USE = 1 << 6;
        const FLUID_CONTAINER = 1 << 7;
        const FLUID = 1 << 8;
        const UNPASSABLE = 1 << 9;
        const UNMOVEABLE = 1 << 10;
        const BLOCK_MISSILE = 1 << 11;
        const BLOCK_PATHFIND = 1 << 12;
        const NO_MOVE_ANIMATION = 1 << 13;
        const PICKUPABLE = 1 << 14;
        const HANGABLE = 1 << 15;
        /// Vertical hook.
        const HOOK_SOUTH = 1 << 16;
        /// Horizontal hook.
        const HOOK_EAST = 1 << 17;
        const ROTATABLE = 1 << 18;
        const DONT_HIDE = 1 << 19;
        const TRANSLUCENT = 1 << 20;
        const LYING_OBJECT = 1 << 21;
        const ANIMATE_ALWAYS = 1 << 22;
        const FULL_GROUND = 1 << 23;
        const IGNORE_LOOK = 1 << 24;
        const WRAPPABLE = 1 << 25;
        const UNWRAPPABLE = 1 << 26;
        const TOP_EFFECT = 1 << 27;
        const HAS_CHARGES = 1 << 28;
        const FLOOR_CHANGE = 1 << 29;
        const USABLE = 1 << 30;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Light {
    pub level: u16,
    pub color: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub x: i16,
    pub y: i16,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarketData {
    pub category: u16,
    pub trade_as: u16,
    pub show_as: u16,
    /// Only Latin-1 survives encoding.
    pub name: String,
    pub restrict_profession: u16,
    pub restrict_level: u16,
}

/// Everything the property stream can say about a thing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThingProperties {
    pub flags: ThingFlags,
    /// Ground speed.
    pub ground: Option<u16>,
    /// Max text length.
    pub writable: Option<u16>,
    /// Max text length.
    pub writable_once: Option<u16>,
    pub light: Option<Light>,
    pub offset: Option<Offset>,
    pub elevation: Option<u16>,
    /// Minimap color.
    pub minimap: Option<u16>,
    pub lens_help: Option<u16>,
    /// Cloth slot.
    pub cloth: Option<u16>,
    pub market: Option<MarketData>,
    pub default_action: Option<u16>,
}

impl ThingProperties {
    /// Whether the attribute behind `flag` is active.
    pub fn has(&self, flag: PropertyFlag) -> bool {
        if let Some(bit) = flag.thing_flag() {
            return self.flags.contains(bit);
        }

        match flag {
            PropertyFlag::Ground => self.ground.is_some(),
            PropertyFlag::Writable => self.writable.is_some(),
            PropertyFlag::WritableOnce => self.writable_once.is_some(),
            PropertyFlag::HasLight => self.light.is_some(),
            PropertyFlag::HasOffset => self.offset.is_some(),
            PropertyFlag::HasElevation => self.elevation.is_some(),
            PropertyFlag::MiniMap => self.minimap.is_some(),
            PropertyFlag::LensHelp => self.lens_help.is_some(),
            PropertyFlag::Cloth => self.cloth.is_some(),
            PropertyFlag::MarketItem => self.market.is_some(),
            PropertyFlag::DefaultAction => self.default_action.is_some(),
            _ => false,
        }
    }

    /// Ground family is exclusive on the wire: ground > border > bottom > top.
    pub fn ground_family(&self) -> Option<PropertyFlag> {
        [
            PropertyFlag::Ground,
            PropertyFlag::GroundBorder,
            PropertyFlag::OnBottom,
            PropertyFlag::OnTop,
        ]
        .into_iter()
        .find(|flag| self.has(*flag))
    }

    pub fn is_stackable(&self) -> bool {
        self.flags.contains(ThingFlags::STACKABLE)
    }
}
