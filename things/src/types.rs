use std::fmt;

use crate::{FrameGroup, ThingProperties};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ThingCategory {
    Item = 1,
    Outfit = 2,
    Effect = 3,
    Missile = 4,
}

impl ThingCategory {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Item),
            2 => Some(Self::Outfit),
            3 => Some(Self::Effect),
            4 => Some(Self::Missile),
            _ => None,
        }
    }
}

impl fmt::Display for ThingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Item => "item",
            Self::Outfit => "outfit",
            Self::Effect => "effect",
            Self::Missile => "missile",
        };

        f.write_str(name)
    }
}

/// Which appearance a frame group describes. Only outfits walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrameGroupKind {
    Default = 0,
    Walking = 1,
}

impl FrameGroupKind {
    pub const ALL: [FrameGroupKind; 2] = [Self::Default, Self::Walking];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thing {
    /// Assigned by the owning store, OBD files do not carry it.
    pub id: u32,
    pub category: ThingCategory,
    pub properties: ThingProperties,
    pub frame_groups: [Option<FrameGroup>; 2],
}

impl Thing {
    /// A blank thing with a single 1x1 default group pointing at sprite 0.
    pub fn new(category: ThingCategory) -> Self {
        Self {
            id: 0,
            category,
            properties: ThingProperties::default(),
            frame_groups: [Some(FrameGroup::new()), None],
        }
    }

    pub fn frame_group(&self, kind: FrameGroupKind) -> Option<&FrameGroup> {
        self.frame_groups[kind.index()].as_ref()
    }

    pub fn frame_group_mut(&mut self, kind: FrameGroupKind) -> Option<&mut FrameGroup> {
        self.frame_groups[kind.index()].as_mut()
    }

    pub fn set_frame_group(&mut self, kind: FrameGroupKind, group: Option<FrameGroup>) {
        self.frame_groups[kind.index()] = group;
    }

    /// Present groups, default first.
    pub fn frame_groups(&self) -> impl Iterator<Item = (FrameGroupKind, &FrameGroup)> {
        FrameGroupKind::ALL
            .into_iter()
            .filter_map(|kind| self.frame_group(kind).map(|group| (kind, group)))
    }

    pub fn frame_group_count(&self) -> usize {
        self.frame_groups.iter().flatten().count()
    }
}
