#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// 16-bit PCM mono WAV bytes holding a short ramp.
pub fn wav_bytes(sample_rate: u32, frames: u32) -> Vec<u8> {
    let channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let block_align = channels * bits_per_sample / 8;
    let byte_rate = sample_rate * u32::from(block_align);
    let data_size = frames * u32::from(block_align);

    let mut bytes = Vec::with_capacity(44 + data_size as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_size).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&channels.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&bits_per_sample.to_le_bytes());

    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_size.to_le_bytes());
    for i in 0..frames {
        let sample = ((i % 64) as i16 - 32) * 512;
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

/// JPEG bytes of a solid-colour image.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([40, 120, 200]));
    let mut cursor = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, image::ImageFormat::Jpeg)
        .expect("encode jpeg");
    cursor.into_inner()
}

/// Write a zip archive holding `entries` (name, bytes).
pub fn write_zip(path: &Path, entries: &[(String, Vec<u8>)]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    let mut zip = ZipWriter::new(File::create(path).expect("create zip"));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, bytes) in entries {
        zip.start_file(name.as_str(), options).expect("start zip entry");
        zip.write_all(bytes).expect("write zip entry");
    }
    zip.finish().expect("finish zip");
}

pub fn md5_hex(path: &Path) -> String {
    geoload::acquire::md5_file(path).expect("md5")
}

/// The two ADVANCE-shaped fixture archives and their digests.
pub struct FixtureArchives {
    pub vision: PathBuf,
    pub sound: PathBuf,
}

impl FixtureArchives {
    pub fn urls(&self) -> Vec<String> {
        vec![
            self.vision.to_string_lossy().to_string(),
            self.sound.to_string_lossy().to_string(),
        ]
    }

    pub fn md5s(&self) -> Vec<String> {
        vec![md5_hex(&self.vision), md5_hex(&self.sound)]
    }
}

/// Build `vision.zip` and `sound.zip` in `dir` with `samples` pairs in
/// category "airport".
pub fn advance_archives(dir: &Path, samples: usize) -> FixtureArchives {
    let mut images = Vec::new();
    let mut sounds = Vec::new();
    for i in 0..samples {
        images.push((format!("vision/airport/{i:05}.jpg"), jpeg_bytes(8, 6)));
        sounds.push((format!("sound/airport/{i:05}.wav"), wav_bytes(8000, 160)));
    }

    let vision = dir.join("vision.zip");
    let sound = dir.join("sound.zip");
    write_zip(&vision, &images);
    write_zip(&sound, &sounds);
    FixtureArchives { vision, sound }
}

/// Write an already-extracted ADVANCE tree under `root`.
pub fn advance_tree(root: &Path, samples: &[(&str, &str)]) {
    for (category, stem) in samples {
        let image = root.join("vision").join(category).join(format!("{stem}.jpg"));
        let audio = root.join("sound").join(category).join(format!("{stem}.wav"));
        fs::create_dir_all(image.parent().expect("parent")).expect("mkdir");
        fs::create_dir_all(audio.parent().expect("parent")).expect("mkdir");
        fs::write(&image, jpeg_bytes(8, 6)).expect("write image");
        fs::write(&audio, wav_bytes(8000, 160)).expect("write audio");
    }
}
