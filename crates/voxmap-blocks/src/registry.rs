use hashbrown::HashMap;
use serde::Deserialize;

use crate::config::BlockConfigError;
use crate::state::BlockId;

/// Face visibility ordering: a face is drawn where density strictly drops across it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    #[default]
    None,
    Liquid,
    Solid,
}

/// Per-block image slots, in inheritance order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FaceSlot {
    Top = 0,
    Bottom = 1,
    Left = 2,
    Right = 3,
    Front = 4,
    Back = 5,
}

impl FaceSlot {
    pub const ALL: [FaceSlot; 6] = [
        FaceSlot::Top,
        FaceSlot::Bottom,
        FaceSlot::Left,
        FaceSlot::Right,
        FaceSlot::Front,
        FaceSlot::Back,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Unresolved block description; faces left `None` inherit at registry build.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub density: Density,
    #[serde(default)]
    pub alpha: bool,
    #[serde(default)]
    pub backfaces: bool,
    #[serde(default)]
    pub top: Option<u16>,
    #[serde(default)]
    pub bottom: Option<u16>,
    #[serde(default)]
    pub left: Option<u16>,
    #[serde(default)]
    pub right: Option<u16>,
    #[serde(default)]
    pub front: Option<u16>,
    #[serde(default)]
    pub back: Option<u16>,
}

impl BlockDef {
    pub fn new(name: &str, density: Density) -> Self {
        Self {
            name: name.to_string(),
            density,
            ..Self::default()
        }
    }

    pub fn face(mut self, slot: FaceSlot, image: u16) -> Self {
        *self.face_mut(slot) = Some(image);
        self
    }

    pub fn alpha(mut self) -> Self {
        self.alpha = true;
        self
    }

    pub fn backfaces(mut self) -> Self {
        self.backfaces = true;
        self
    }

    fn face_mut(&mut self, slot: FaceSlot) -> &mut Option<u16> {
        match slot {
            FaceSlot::Top => &mut self.top,
            FaceSlot::Bottom => &mut self.bottom,
            FaceSlot::Left => &mut self.left,
            FaceSlot::Right => &mut self.right,
            FaceSlot::Front => &mut self.front,
            FaceSlot::Back => &mut self.back,
        }
    }

    fn faces(&self) -> [Option<u16>; 6] {
        [
            self.top,
            self.bottom,
            self.left,
            self.right,
            self.front,
            self.back,
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockInfo {
    pub name: String,
    pub faces: [u16; 6],
    pub density: Density,
    pub alpha: bool,
    pub backfaces: bool,
}

impl BlockInfo {
    #[inline]
    pub fn image(&self, slot: FaceSlot) -> u16 {
        self.faces[slot.index()]
    }
}

/// Fill unset slots from the most recent set slot in `FaceSlot` order.
pub fn resolve_faces(faces: [Option<u16>; 6], fallback: u16) -> [u16; 6] {
    let mut out = [fallback; 6];
    let mut last = fallback;
    for (i, f) in faces.iter().enumerate() {
        if let Some(img) = f {
            last = *img;
        }
        out[i] = last;
    }
    out
}

pub const DEFAULT_FALLBACK_IMAGE: u16 = 255;

#[derive(Clone, Debug, Default)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockInfo>,
    pub by_name: HashMap<String, BlockId>,
    pub fallback_image: u16,
}

impl BlockRegistry {
    /// The stock block table.
    pub fn builtin() -> Self {
        use FaceSlot::*;
        let defs = vec![
            BlockDef::new("air", Density::None),
            BlockDef::new("bedrock", Density::Solid).face(Top, 17),
            BlockDef::new("stone", Density::Solid).face(Top, 1),
            BlockDef::new("dirt", Density::Solid).face(Top, 2),
            BlockDef::new("grass", Density::Solid)
                .face(Top, 0)
                .face(Bottom, 2)
                .face(Left, 3),
            BlockDef::new("sand", Density::Solid).face(Top, 18),
            BlockDef::new("water", Density::Liquid)
                .face(Top, 205)
                .alpha()
                .backfaces(),
            BlockDef::new("glass", Density::Solid).face(Top, 49).alpha(),
            BlockDef::new("log", Density::Solid)
                .face(Top, 21)
                .face(Bottom, 21)
                .face(Left, 20),
            BlockDef::new("leaves", Density::Solid)
                .face(Top, 52)
                .backfaces(),
            BlockDef::new("planks", Density::Solid).face(Top, 4),
        ];
        Self::assemble(defs, DEFAULT_FALLBACK_IMAGE)
    }

    /// Validates a block table and resolves face inheritance.
    pub fn from_defs(defs: Vec<BlockDef>, fallback_image: u16) -> Result<Self, BlockConfigError> {
        let Some(first) = defs.first() else {
            return Err(BlockConfigError::Empty);
        };
        if first.density != Density::None {
            return Err(BlockConfigError::AirNotFirst(first.name.clone()));
        }
        if defs.len() > usize::from(BlockId::MAX) + 1 {
            return Err(BlockConfigError::TooMany(defs.len()));
        }
        {
            let mut seen = hashbrown::HashSet::with_capacity(defs.len());
            for d in &defs {
                if !seen.insert(d.name.as_str()) {
                    return Err(BlockConfigError::Duplicate(d.name.clone()));
                }
            }
        }
        Ok(Self::assemble(defs, fallback_image))
    }

    fn assemble(defs: Vec<BlockDef>, fallback_image: u16) -> Self {
        let mut blocks = Vec::with_capacity(defs.len());
        let mut by_name = HashMap::with_capacity(defs.len());
        for (id, d) in defs.into_iter().enumerate() {
            by_name.insert(d.name.clone(), id as BlockId);
            blocks.push(BlockInfo {
                faces: resolve_faces(d.faces(), fallback_image),
                name: d.name,
                density: d.density,
                alpha: d.alpha,
                backfaces: d.backfaces,
            });
        }
        Self {
            blocks,
            by_name,
            fallback_image,
        }
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockInfo> {
        self.blocks.get(id as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    /// Unknown ids read as non-dense so they never occlude.
    #[inline]
    pub fn density(&self, id: BlockId) -> Density {
        self.get(id).map(|b| b.density).unwrap_or(Density::None)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &BlockInfo)> {
        self.blocks.iter().enumerate().map(|(i, b)| (i as BlockId, b))
    }
}
