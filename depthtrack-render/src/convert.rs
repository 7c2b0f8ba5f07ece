use depthtrack_common::{ChannelOrder, ColorFrame, DepthFrame, Palette, UserFrame};
use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::overlay::Overlay;
use crate::RenderError;

/// Gray level of a depth, 0 is white and `max_depth` or farther is black
fn shade(depth: u16, max_depth: u16) -> u8 {
    let level = 255.0 - depth as f64 * 255.0 / max_depth as f64;
    level.round().clamp(0.0, 255.0) as u8
}

fn check_len(kind: &'static str, expected: usize, actual: usize) -> Result<(), RenderError> {
    if expected != actual {
        return Err(RenderError::BufferSize { kind, expected, actual });
    }
    Ok(())
}

/// Copy a packed color frame into an RGB image
pub fn color_image(frame: &ColorFrame) -> Result<RgbImage, RenderError> {
    let res = frame.resolution;
    check_len("color", res.total() * 3, frame.data.len())?;

    let mut image = RgbImage::new(res.w as u32, res.h as u32);
    for (pixel, c) in image.pixels_mut().zip(frame.data.chunks_exact(3)) {
        *pixel = match frame.order {
            ChannelOrder::Rgb => Rgb([c[0], c[1], c[2]]),
            ChannelOrder::Bgr => Rgb([c[2], c[1], c[0]]),
        };
    }
    Ok(image)
}

/// Scale a depth frame into 8-bit gray, depths past `max_depth` saturate
pub fn depth_image(
    frame: &DepthFrame,
    max_depth: u16,
) -> Result<GrayImage, RenderError> {
    if max_depth == 0 {
        return Err(RenderError::InvalidMaxDepth);
    }
    let res = frame.resolution;
    check_len("depth", res.total(), frame.data.len())?;

    let mut image = GrayImage::new(res.w as u32, res.h as u32);
    for (pixel, &depth) in image.pixels_mut().zip(frame.data.iter()) {
        *pixel = Luma([shade(depth, max_depth)]);
    }
    Ok(image)
}

/// Shaded depth with every user's pixels painted in the user color and a box
/// around each user
pub fn user_image(
    depth: &DepthFrame,
    users: &UserFrame,
    max_depth: u16,
    palette: &Palette,
) -> Result<RgbImage, RenderError> {
    if users.resolution != depth.resolution {
        return Err(RenderError::ResolutionMismatch {
            labels: users.resolution,
            depth: depth.resolution,
        });
    }
    check_len("label", users.resolution.total(), users.labels.len())?;

    let gray = depth_image(depth, max_depth)?;
    let mut image = RgbImage::new(gray.width(), gray.height());
    for ((pixel, level), &label) in image.pixels_mut().zip(gray.pixels()).zip(users.labels.iter()) {
        let color = match label {
            0 => None,
            label => palette.color_for(label as i32),
        };
        *pixel = Rgb(color.unwrap_or([level[0]; 3]));
    }

    Overlay::new(palette.clone()).users(&mut image, &users.users);
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use depthtrack_common::{BoundingBox, Resolution, User};

    #[test]
    fn color_channel_order() {
        let frame = ColorFrame {
            resolution: Resolution::new(2, 1),
            order: ChannelOrder::Bgr,
            data: vec![1, 2, 3, 4, 5, 6],
        };
        let image = color_image(&frame).unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgb([3, 2, 1]));
        assert_eq!(image.get_pixel(1, 0), &Rgb([6, 5, 4]));

        let frame = ColorFrame { order: ChannelOrder::Rgb, ..frame };
        let image = color_image(&frame).unwrap();
        assert_eq!(image.get_pixel(1, 0), &Rgb([4, 5, 6]));
    }

    #[test]
    fn color_buffer_too_short() {
        let frame = ColorFrame {
            resolution: Resolution::new(2, 2),
            order: ChannelOrder::Rgb,
            data: vec![0; 9],
        };
        let err = color_image(&frame).unwrap_err();
        assert!(matches!(err, RenderError::BufferSize { expected: 12, actual: 9, .. }));
    }

    #[test]
    fn depth_shading() {
        let frame = DepthFrame {
            resolution: Resolution::new(4, 1),
            data: vec![0, 2000, 4000, 9000],
        };
        let image = depth_image(&frame, 4000).unwrap();
        let levels: Vec<u8> = image.pixels().map(|p| p[0]).collect();
        assert_eq!(levels, [255, 128, 0, 0]);

        assert!(matches!(
            depth_image(&frame, 0),
            Err(RenderError::InvalidMaxDepth)
        ));
    }

    #[test]
    fn user_pixels_take_palette_color() {
        let resolution = Resolution::new(3, 1);
        let depth = DepthFrame { resolution, data: vec![0, 1000, 1000] };
        let users = UserFrame {
            resolution,
            labels: vec![0, 2, 9],
            users: vec![],
        };
        let palette = Palette::default();
        let image = user_image(&depth, &users, 1000, &palette).unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(image.get_pixel(1, 0), &Rgb([0, 255, 0]));
        // Label without a palette entry keeps the depth shade
        assert_eq!(image.get_pixel(2, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn user_box_is_drawn() {
        let resolution = Resolution::new(10, 10);
        let depth = DepthFrame { resolution, data: vec![0; 100] };
        let users = UserFrame {
            resolution,
            labels: vec![0; 100],
            users: vec![User {
                id: 3,
                bbox: BoundingBox { left: 0.2, top: 0.2, right: 0.8, bottom: 0.8 },
            }],
        };
        let image = user_image(&depth, &users, 1000, &Palette::default()).unwrap();
        assert_eq!(image.get_pixel(2, 2), &Rgb([255, 0, 0]));
        assert_eq!(image.get_pixel(5, 5), &Rgb([255, 255, 255]));
    }

    #[test]
    fn label_resolution_mismatch() {
        let depth = DepthFrame { resolution: Resolution::new(2, 2), data: vec![0; 4] };
        let users = UserFrame {
            resolution: Resolution::new(2, 1),
            labels: vec![0; 2],
            users: vec![],
        };
        let err = user_image(&depth, &users, 1000, &Palette::default()).unwrap_err();
        assert!(matches!(err, RenderError::ResolutionMismatch { .. }));
    }
}
