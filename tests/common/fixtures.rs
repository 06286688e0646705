use footsize::BoundingBox;
use image::{GrayImage, Luma, Rgb, RgbImage};
use std::path::{Path, PathBuf};

pub const BACKGROUND: Rgb<u8> = Rgb([40, 40, 40]);
pub const PAPER: Rgb<u8> = Rgb([245, 245, 245]);
pub const SKIN: Rgb<u8> = Rgb([200, 150, 120]);
pub const DARK_SKIN: Rgb<u8> = Rgb([70, 45, 35]);

/// Image of a single color
pub fn uniform_image(width: u32, height: u32, color: Rgb<u8>) -> RgbImage {
    RgbImage::from_pixel(width, height, color)
}

/// Dark floor, a white A4-proportioned sheet, and a pale elliptical "foot"
/// standing on the sheet. The foot clusters with the paper, so the photo
/// does not measure; use [`foot_on_paper`] for a full measurement.
pub fn synthetic_photo() -> RgbImage {
    photo_with_foot(SKIN)
}

/// Same scene as [`synthetic_photo`] with a dark foot that clusters apart
/// from the paper
pub fn foot_on_paper() -> RgbImage {
    photo_with_foot(DARK_SKIN)
}

fn photo_with_foot(foot: Rgb<u8>) -> RgbImage {
    let (width, height) = (160, 200);
    let mut img = uniform_image(width, height, BACKGROUND);

    // sheet: 105 x 148 px, roughly 210 x 297 mm at 0.5 px/mm
    let (paper_x, paper_y, paper_w, paper_h) = (28, 26, 105, 148);
    fill_rect_rgb(&mut img, paper_x, paper_y, paper_w, paper_h, PAPER);

    // foot: ellipse centered on the sheet, long axis vertical
    let (cx, cy) = (80.0f32, 100.0f32);
    let (rx, ry) = (22.0f32, 55.0f32);
    for y in 0..height {
        for x in 0..width {
            let dx = (x as f32 - cx) / rx;
            let dy = (y as f32 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                img.put_pixel(x, y, foot);
            }
        }
    }
    img
}

/// Left half one color, right half another
pub fn split_image(width: u32, height: u32, left: Rgb<u8>, right: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| if x < width / 2 { left } else { right })
}

pub fn fill_rect_rgb(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    for py in y..(y + h).min(img.height()) {
        for px in x..(x + w).min(img.width()) {
            img.put_pixel(px, py, color);
        }
    }
}

pub fn fill_rect_gray(img: &mut GrayImage, x: u32, y: u32, w: u32, h: u32, value: u8) {
    for py in y..(y + h).min(img.height()) {
        for px in x..(x + w).min(img.width()) {
            img.put_pixel(px, py, Luma([value]));
        }
    }
}

/// Pass-1 boxes in the usual order: photo frame, paper, something smaller
pub fn ranked_boxes(paper: BoundingBox) -> Vec<BoundingBox> {
    vec![
        BoundingBox::new(0, 0, 200, 200),
        paper,
        BoundingBox::new(5, 5, 4, 4),
    ]
}

/// Write `<root>/<platform>/<gender>.csv` with the given body and return its path
pub fn write_chart(root: &Path, platform: &str, gender: &str, body: &str) -> PathBuf {
    let dir = root.join(platform);
    std::fs::create_dir_all(&dir).expect("Failed to create chart directory");
    let path = dir.join(format!("{gender}.csv"));
    std::fs::write(&path, body).expect("Failed to write chart");
    path
}

pub const BASIC_CHART: &str = "cm,url\n\
22.0,https://shop.example/22\n\
22.5,https://shop.example/22-5\n\
23.0,https://shop.example/23\n";
