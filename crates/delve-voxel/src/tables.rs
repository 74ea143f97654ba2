//! Named neighbor, face and corner tables.
//!
//! Axis convention: +Y is up, North is -Z (the box's Back), South is +Z
//! (Front), East is +X (Right) and West is -X (Left).

use core::ops::BitOr;

use crate::constants::RAMP_TYPE_MASK;
use crate::coord::GlobalVoxelOffset;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BoxFace {
    Top = 0,
    Bottom = 1,
    Left = 2,
    Right = 3,
    Front = 4,
    Back = 5,
}

impl BoxFace {
    pub const ALL: [BoxFace; 6] = [
        BoxFace::Top,
        BoxFace::Bottom,
        BoxFace::Left,
        BoxFace::Right,
        BoxFace::Front,
        BoxFace::Back,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Step from a voxel to the neighbor behind this face.
    #[inline]
    pub const fn delta(self) -> GlobalVoxelOffset {
        match self {
            BoxFace::Top => GlobalVoxelOffset::new(0, 1, 0),
            BoxFace::Bottom => GlobalVoxelOffset::new(0, -1, 0),
            BoxFace::Left => GlobalVoxelOffset::new(-1, 0, 0),
            BoxFace::Right => GlobalVoxelOffset::new(1, 0, 0),
            BoxFace::Front => GlobalVoxelOffset::new(0, 0, 1),
            BoxFace::Back => GlobalVoxelOffset::new(0, 0, -1),
        }
    }

    #[inline]
    pub fn is_side(self) -> bool {
        !matches!(self, BoxFace::Top | BoxFace::Bottom)
    }

    /// Compass direction of a side face.
    pub const fn cardinal(self) -> Option<Cardinal> {
        match self {
            BoxFace::Back => Some(Cardinal::North),
            BoxFace::Right => Some(Cardinal::East),
            BoxFace::Front => Some(Cardinal::South),
            BoxFace::Left => Some(Cardinal::West),
            BoxFace::Top | BoxFace::Bottom => None,
        }
    }
}

/// The eight corners of a unit voxel. Bit 0 selects Right, bit 1 Top and
/// bit 2 Front.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VoxelVertex {
    BackBottomLeft = 0,
    BackBottomRight = 1,
    BackTopLeft = 2,
    BackTopRight = 3,
    FrontBottomLeft = 4,
    FrontBottomRight = 5,
    FrontTopLeft = 6,
    FrontTopRight = 7,
}

impl VoxelVertex {
    pub const ALL: [VoxelVertex; 8] = [
        VoxelVertex::BackBottomLeft,
        VoxelVertex::BackBottomRight,
        VoxelVertex::BackTopLeft,
        VoxelVertex::BackTopRight,
        VoxelVertex::FrontBottomLeft,
        VoxelVertex::FrontBottomRight,
        VoxelVertex::FrontTopLeft,
        VoxelVertex::FrontTopRight,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_right(self) -> bool {
        self as u8 & 1 != 0
    }

    #[inline]
    pub fn is_top(self) -> bool {
        self as u8 & 2 != 0
    }

    #[inline]
    pub fn is_front(self) -> bool {
        self as u8 & 4 != 0
    }

    /// Corner position inside the unit cube, each component 0 or 1.
    #[inline]
    pub fn corner(self) -> (i32, i32, i32) {
        (self.is_right() as i32, self.is_top() as i32, self.is_front() as i32)
    }

    /// The corner touching this one across the face toward `c`, on the
    /// neighbor voxel.
    pub fn across(self, c: Cardinal) -> VoxelVertex {
        let bit = match c {
            Cardinal::East | Cardinal::West => 1,
            Cardinal::North | Cardinal::South => 4,
        };
        VoxelVertex::ALL[(self as usize) ^ bit]
    }

    /// Direction away from the voxel centre through this corner, each
    /// component -1 or +1.
    #[inline]
    fn outward(self) -> (i32, i32, i32) {
        let s = |b: bool| if b { 1 } else { -1 };
        (s(self.is_right()), s(self.is_top()), s(self.is_front()))
    }
}

/// 4-bit mask of lowered top corners. Bit 4 of the packed field is reserved.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct RampType(u8);

impl RampType {
    pub const NONE: RampType = RampType(0);
    pub const TOP_FRONT_LEFT: RampType = RampType(1);
    pub const TOP_FRONT_RIGHT: RampType = RampType(2);
    pub const TOP_BACK_LEFT: RampType = RampType(4);
    pub const TOP_BACK_RIGHT: RampType = RampType(8);
    pub const ALL: RampType = RampType(0x0F);

    #[inline]
    pub const fn from_bits(bits: u8) -> RampType {
        RampType(bits & RAMP_TYPE_MASK)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn intersects(self, other: RampType) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn insert(&mut self, other: RampType) {
        self.0 |= other.0;
    }

    /// Corner bit controlling a top vertex; bottom vertices never ramp.
    #[inline]
    pub fn for_vertex(v: VoxelVertex) -> RampType {
        match v {
            VoxelVertex::FrontTopLeft => RampType::TOP_FRONT_LEFT,
            VoxelVertex::FrontTopRight => RampType::TOP_FRONT_RIGHT,
            VoxelVertex::BackTopLeft => RampType::TOP_BACK_LEFT,
            VoxelVertex::BackTopRight => RampType::TOP_BACK_RIGHT,
            _ => RampType::NONE,
        }
    }

    #[inline]
    pub fn lowers(self, v: VoxelVertex) -> bool {
        self.intersects(RampType::for_vertex(v))
    }
}

impl BitOr for RampType {
    type Output = RampType;
    fn bitor(self, rhs: RampType) -> RampType {
        RampType(self.0 | rhs.0)
    }
}

/// Horizontal orthogonal neighbors, in fringe/transition order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Cardinal {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Cardinal {
    pub const ALL: [Cardinal; 4] = [Cardinal::North, Cardinal::East, Cardinal::South, Cardinal::West];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn offset(self) -> GlobalVoxelOffset {
        match self {
            Cardinal::North => GlobalVoxelOffset::new(0, 0, -1),
            Cardinal::East => GlobalVoxelOffset::new(1, 0, 0),
            Cardinal::South => GlobalVoxelOffset::new(0, 0, 1),
            Cardinal::West => GlobalVoxelOffset::new(-1, 0, 0),
        }
    }

    /// The two top corners on this side, ordered so that the quad
    /// `[a, a + dir, b + dir, b]` winds the same way as the top face.
    pub const fn top_edge(self) -> (VoxelVertex, VoxelVertex) {
        match self {
            Cardinal::North => (VoxelVertex::BackTopLeft, VoxelVertex::BackTopRight),
            Cardinal::East => (VoxelVertex::BackTopRight, VoxelVertex::FrontTopRight),
            Cardinal::South => (VoxelVertex::FrontTopRight, VoxelVertex::FrontTopLeft),
            Cardinal::West => (VoxelVertex::FrontTopLeft, VoxelVertex::BackTopLeft),
        }
    }

    /// UV scale of a side fringe decal: half a tile across the fringe.
    pub const fn fringe_uv_scale(self) -> (f32, f32) {
        match self {
            Cardinal::North | Cardinal::South => (1.0, 0.5),
            Cardinal::East | Cardinal::West => (0.5, 1.0),
        }
    }
}

/// Horizontal diagonal neighbors, in fringe order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Diagonal {
    NorthWest = 0,
    NorthEast = 1,
    SouthEast = 2,
    SouthWest = 3,
}

impl Diagonal {
    pub const ALL: [Diagonal; 4] = [
        Diagonal::NorthWest,
        Diagonal::NorthEast,
        Diagonal::SouthEast,
        Diagonal::SouthWest,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn offset(self) -> GlobalVoxelOffset {
        match self {
            Diagonal::NorthWest => GlobalVoxelOffset::new(-1, 0, -1),
            Diagonal::NorthEast => GlobalVoxelOffset::new(1, 0, -1),
            Diagonal::SouthEast => GlobalVoxelOffset::new(1, 0, 1),
            Diagonal::SouthWest => GlobalVoxelOffset::new(-1, 0, 1),
        }
    }

    /// The two orthogonal neighbors flanking this diagonal.
    pub const fn flanks(self) -> (Cardinal, Cardinal) {
        match self {
            Diagonal::NorthWest => (Cardinal::North, Cardinal::West),
            Diagonal::NorthEast => (Cardinal::East, Cardinal::North),
            Diagonal::SouthEast => (Cardinal::South, Cardinal::East),
            Diagonal::SouthWest => (Cardinal::West, Cardinal::South),
        }
    }

    /// Top corner the diagonal fringe grows out of.
    pub const fn pivot(self) -> VoxelVertex {
        match self {
            Diagonal::NorthWest => VoxelVertex::BackTopLeft,
            Diagonal::NorthEast => VoxelVertex::BackTopRight,
            Diagonal::SouthEast => VoxelVertex::FrontTopRight,
            Diagonal::SouthWest => VoxelVertex::FrontTopLeft,
        }
    }
}

/// Neighbors sampled when lighting a corner: the 4 voxels above the corner
/// plane for top corners, otherwise the 8 voxels (self included) sharing it.
pub fn vertex_neighbors(v: VoxelVertex) -> impl Iterator<Item = GlobalVoxelOffset> {
    let (ox, _, oz) = v.outward();
    let ys: &'static [i32] = if v.is_top() { &[1] } else { &[0, -1] };
    ys.iter().flat_map(move |&dy| {
        [0, ox].into_iter().flat_map(move |dx| {
            [0, oz]
                .into_iter()
                .map(move |dz| GlobalVoxelOffset::new(dx, dy, dz))
        })
    })
}

/// The 3 other voxels in the same layer that share this corner's vertical edge.
pub fn vertex_neighbors_2d(v: VoxelVertex) -> [GlobalVoxelOffset; 3] {
    let (ox, _, oz) = v.outward();
    [
        GlobalVoxelOffset::new(ox, 0, 0),
        GlobalVoxelOffset::new(ox, 0, oz),
        GlobalVoxelOffset::new(0, 0, oz),
    ]
}

/// Orthogonal neighbors in the XY plane (used for front/back transitions).
pub const PLANE_Z_NEIGHBORS: [GlobalVoxelOffset; 4] = [
    GlobalVoxelOffset::new(0, 1, 0),
    GlobalVoxelOffset::new(1, 0, 0),
    GlobalVoxelOffset::new(0, -1, 0),
    GlobalVoxelOffset::new(-1, 0, 0),
];

/// Orthogonal neighbors in the YZ plane (used for left/right transitions).
pub const PLANE_X_NEIGHBORS: [GlobalVoxelOffset; 4] = [
    GlobalVoxelOffset::new(0, 1, 0),
    GlobalVoxelOffset::new(0, 0, 1),
    GlobalVoxelOffset::new(0, -1, 0),
    GlobalVoxelOffset::new(0, 0, -1),
];

/// Weight of the i-th neighbor in an autotile mask.
pub const TRANSITION_MULTIPLIERS: [u8; 4] = [1, 2, 4, 8];
