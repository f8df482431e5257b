//! Builders for synthetic MD3 files and player model directories

#![allow(dead_code)]

use q3_md3::animation::{AnimNumber, MAX_ANIMATIONS};
use q3_md3::header::{
    FRAME_SIZE, HEADER_SIZE, SHADER_SIZE, SURFACE_HEADER_SIZE, TAG_SIZE, TEXCOORD_SIZE,
    TRIANGLE_SIZE, VERTEX_SIZE,
};
use q3_md3::MemoryProvider;

/// Byte offset of `ofsSurfaces` in the file header
pub const NUM_SURFACES_FIELD: usize = 84;
pub const OFS_SURFACES_FIELD: usize = 100;

#[derive(Debug, Clone)]
pub struct TestTag {
    pub name: String,
    pub origin: [f32; 3],
    pub axis: [[f32; 3]; 3],
}

impl TestTag {
    pub fn at(name: &str, origin: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            origin,
            axis: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestSurface {
    pub name: String,
    pub shader: Option<String>,
    pub triangles: Vec<[i32; 3]>,
    /// Per frame: (x, y, z) in 1/64 units and the packed normal
    pub frames: Vec<Vec<([i16; 3], u16)>>,
}

impl TestSurface {
    /// One triangle whose vertices stay put across `num_frames`
    pub fn triangle(name: &str, num_frames: usize, verts: [[i16; 3]; 3]) -> Self {
        Self {
            name: name.to_string(),
            shader: None,
            triangles: vec![[0, 1, 2]],
            frames: (0..num_frames)
                .map(|_| verts.iter().map(|&v| (v, 0)).collect())
                .collect(),
        }
    }

    fn num_verts(&self) -> usize {
        self.frames.first().map_or(0, Vec::len)
    }

    fn encode(&self) -> Vec<u8> {
        let num_verts = self.num_verts();
        let num_shaders = usize::from(self.shader.is_some());
        let ofs_shaders = SURFACE_HEADER_SIZE;
        let ofs_triangles = ofs_shaders + num_shaders * SHADER_SIZE;
        let ofs_st = ofs_triangles + self.triangles.len() * TRIANGLE_SIZE;
        let ofs_xyz = ofs_st + num_verts * TEXCOORD_SIZE;
        let ofs_end = ofs_xyz + self.frames.len() * num_verts * VERTEX_SIZE;

        let mut out = Vec::with_capacity(ofs_end);
        out.extend_from_slice(b"IDP3");
        put_name(&mut out, &self.name, 64);
        put_i32(&mut out, 0);
        put_i32(&mut out, self.frames.len() as i32);
        put_i32(&mut out, num_shaders as i32);
        put_i32(&mut out, num_verts as i32);
        put_i32(&mut out, self.triangles.len() as i32);
        put_i32(&mut out, ofs_triangles as i32);
        put_i32(&mut out, ofs_shaders as i32);
        put_i32(&mut out, ofs_st as i32);
        put_i32(&mut out, ofs_xyz as i32);
        put_i32(&mut out, ofs_end as i32);

        if let Some(shader) = &self.shader {
            put_name(&mut out, shader, 64);
            put_i32(&mut out, 0);
        }
        for tri in &self.triangles {
            for &index in tri {
                put_i32(&mut out, index);
            }
        }
        for i in 0..num_verts {
            put_f32(&mut out, i as f32 / num_verts as f32);
            put_f32(&mut out, 0.5);
        }
        for frame in &self.frames {
            for (xyz, normal) in frame {
                for c in xyz {
                    out.extend_from_slice(&c.to_le_bytes());
                }
                out.extend_from_slice(&normal.to_le_bytes());
            }
        }

        assert_eq!(out.len(), ofs_end);
        out
    }
}

/// Assembles a complete MD3 file
#[derive(Debug, Clone)]
pub struct Md3Builder {
    pub name: String,
    pub num_frames: usize,
    /// Tags of each frame; every frame must list the same number of tags
    pub frame_tags: Vec<Vec<TestTag>>,
    pub surfaces: Vec<TestSurface>,
}

impl Md3Builder {
    pub fn new(name: &str, num_frames: usize) -> Self {
        Self {
            name: name.to_string(),
            num_frames,
            frame_tags: vec![Vec::new(); num_frames],
            surfaces: Vec::new(),
        }
    }

    /// Same tag in every frame, moved by `step` per frame
    pub fn with_moving_tag(mut self, name: &str, origin: [f32; 3], step: [f32; 3]) -> Self {
        for (frame, tags) in self.frame_tags.iter_mut().enumerate() {
            let f = frame as f32;
            tags.push(TestTag::at(
                name,
                [
                    origin[0] + step[0] * f,
                    origin[1] + step[1] * f,
                    origin[2] + step[2] * f,
                ],
            ));
        }
        self
    }

    pub fn with_tag(self, name: &str, origin: [f32; 3]) -> Self {
        self.with_moving_tag(name, origin, [0.0; 3])
    }

    pub fn with_surface(mut self, surface: TestSurface) -> Self {
        self.surfaces.push(surface);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let num_tags = self.frame_tags.first().map_or(0, Vec::len);
        let ofs_frames = HEADER_SIZE;
        let ofs_tags = ofs_frames + self.num_frames * FRAME_SIZE;
        let ofs_surfaces = ofs_tags + self.num_frames * num_tags * TAG_SIZE;
        let surfaces: Vec<Vec<u8>> = self.surfaces.iter().map(TestSurface::encode).collect();
        let ofs_end = ofs_surfaces + surfaces.iter().map(Vec::len).sum::<usize>();

        let mut out = Vec::with_capacity(ofs_end);
        out.extend_from_slice(b"IDP3");
        put_i32(&mut out, 15);
        put_name(&mut out, &self.name, 64);
        put_i32(&mut out, 0);
        put_i32(&mut out, self.num_frames as i32);
        put_i32(&mut out, num_tags as i32);
        put_i32(&mut out, self.surfaces.len() as i32);
        put_i32(&mut out, 0);
        put_i32(&mut out, ofs_frames as i32);
        put_i32(&mut out, ofs_tags as i32);
        put_i32(&mut out, ofs_surfaces as i32);
        put_i32(&mut out, ofs_end as i32);
        assert_eq!(out.len(), HEADER_SIZE);

        for frame in 0..self.num_frames {
            for v in [-16.0, -16.0, 0.0, 16.0, 16.0, 32.0, 0.0, 0.0, 0.0, 24.0] {
                put_f32(&mut out, v);
            }
            put_name(&mut out, &format!("frame{frame}"), 16);
        }

        for tags in &self.frame_tags {
            for tag in tags {
                put_name(&mut out, &tag.name, 64);
                for c in tag.origin {
                    put_f32(&mut out, c);
                }
                for row in tag.axis {
                    for c in row {
                        put_f32(&mut out, c);
                    }
                }
            }
        }

        for surface in surfaces {
            out.extend_from_slice(&surface);
        }
        assert_eq!(out.len(), ofs_end);
        out
    }
}

pub fn put_i32(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn put_f32(out: &mut Vec<u8>, value: f32) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn put_name(out: &mut Vec<u8>, name: &str, width: usize) {
    let mut field = vec![0u8; width];
    let len = name.len().min(width - 1);
    field[..len].copy_from_slice(&name.as_bytes()[..len]);
    out.extend_from_slice(&field);
}

pub fn patch_i32(data: &mut [u8], offset: usize, value: i32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// `animation.cfg` text with one `first num loop fps` line per parsed
/// animation
pub fn animation_cfg(line: impl Fn(AnimNumber) -> (i32, i32, i32, f32)) -> String {
    let mut text = String::from("// test model\nsex m\nfootsteps normal\n");
    for anim in AnimNumber::ALL.iter().copied().take(MAX_ANIMATIONS) {
        let (first, num, looping, fps) = line(anim);
        text.push_str(&format!("{first}\t{num}\t{looping}\t{fps}\t// {}\n", anim.name()));
    }
    text
}

pub const PLAYER_DIR: &str = "models/players/tester";

/// Legs frames 0..10 hold LEGS_IDLE at 0..4 and LEGS_RUN at 4..10, numbered
/// after 10 torso frames in the config. Torso frames 0..4 hold TORSO_STAND.
pub fn player_cfg() -> String {
    animation_cfg(|anim| match anim {
        AnimNumber::TorsoGesture => (0, 2, 0, 10.0),
        AnimNumber::TorsoStand => (0, 4, 4, 10.0),
        AnimNumber::TorsoAttack => (4, 6, 0, 20.0),
        AnimNumber::LegsWalkCr => (10, 2, 2, 10.0),
        AnimNumber::LegsIdle => (10, 4, 4, 10.0),
        AnimNumber::LegsRun => (14, 6, 6, 10.0),
        _ => (0, 1, 0, 10.0),
    })
}

/// In-memory player model directory with all three parts, an animation
/// table and a `default` and `blue` skin
pub fn player_provider() -> MemoryProvider {
    let legs = Md3Builder::new("lower", 10)
        .with_moving_tag("tag_torso", [0.0, 0.0, 20.0], [0.0, 0.0, 1.0])
        .with_surface(TestSurface::triangle(
            "l_legs",
            10,
            [[-640, -640, -1536], [640, 0, -1536], [0, 640, 0]],
        ));
    let torso = Md3Builder::new("upper", 10)
        .with_tag("tag_head", [0.0, 0.0, 16.0])
        .with_tag("tag_weapon", [8.0, 0.0, 8.0])
        .with_surface(TestSurface::triangle(
            "u_torso",
            10,
            [[-640, -640, 0], [640, 0, 0], [0, 640, 1024]],
        ));
    let mut head_surface =
        TestSurface::triangle("h_head", 1, [[-256, -256, 0], [256, 0, 0], [0, 256, 512]]);
    head_surface.shader = Some("models/players/tester/head.tga".to_string());
    let head = Md3Builder::new("head", 1).with_surface(head_surface);

    MemoryProvider::new()
        .with(format!("{PLAYER_DIR}/lower.md3"), legs.build())
        .with(format!("{PLAYER_DIR}/upper.md3"), torso.build())
        .with(format!("{PLAYER_DIR}/head.md3"), head.build())
        .with(format!("{PLAYER_DIR}/animation.cfg"), player_cfg())
        .with(
            format!("{PLAYER_DIR}/lower_default.skin"),
            "l_legs,models/players/tester/legs.tga\n",
        )
        .with(
            format!("{PLAYER_DIR}/upper_default.skin"),
            "tag_head,\nu_torso,models/players/tester/torso.tga\n",
        )
        .with(format!("{PLAYER_DIR}/head_default.skin"), "")
        .with(
            format!("{PLAYER_DIR}/lower_blue.skin"),
            "l_legs,models/players/tester/legs_blue.tga\n",
        )
        .with(
            format!("{PLAYER_DIR}/upper_blue.skin"),
            "u_torso,models/players/tester/torso_blue.tga\n",
        )
        .with(
            format!("{PLAYER_DIR}/head_blue.skin"),
            "h_head,models/players/tester/head_blue.tga\n",
        )
}
