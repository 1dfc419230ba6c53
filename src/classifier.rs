use crate::catalog::Category;
use crate::config::AppConfig;
use crate::error::AppError;
use candle_core::{DType, Device, Tensor};
use candle_nn::{Module, VarBuilder};
use candle_transformers::models::resnet;
use image::imageops::FilterType;
use std::path::Path;
use std::sync::Mutex;

pub const IMAGE_SIZE: usize = 224;

// ImageNet channel statistics the model was trained with.
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

#[derive(Debug, Clone, Copy)]
pub struct Prediction {
    pub category: Category,
    pub confidence: f32,
}

/// ResNet-18 with its final layer sized to the category set, restored from a
/// safetensors file and run CPU-only in inference mode. Concurrent requests
/// serialize on the model mutex.
pub struct Classifier {
    model: Mutex<candle_nn::Func<'static>>,
    device: Device,
}

impl Classifier {
    /// Missing or shape-incompatible weights fail here, at startup.
    pub fn load(config: &AppConfig) -> Result<Self, AppError> {
        let weights = Path::new(&config.weights_path);
        if !weights.exists() {
            return Err(AppError::WeightsNotFound(config.weights_path.clone()));
        }
        let device = Device::Cpu;
        log::info!("Loading classifier weights from {:?}", weights);
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, &device)? };
        let model = resnet::resnet18(Category::ALL.len(), vb)?;
        log::info!("Classifier model loaded successfully");
        Ok(Self {
            model: Mutex::new(model),
            device,
        })
    }

    /// Decode raw image bytes and return the most probable category with its
    /// softmax confidence.
    pub fn predict(&self, bytes: &[u8]) -> Result<Prediction, AppError> {
        let img = image::load_from_memory(bytes)?;
        let input = preprocess(&img, &self.device)?;

        let logits = {
            let model = self
                .model
                .lock()
                .map_err(|_| candle_core::Error::Msg("classifier mutex poisoned".to_string()))?;
            model.forward(&input)?
        };
        let probs = candle_nn::ops::softmax(&logits, 1)?;
        let probs: Vec<f32> = probs.flatten_all()?.to_vec1()?;

        let mut best_index = 0;
        let mut best_prob = 0f32;
        for (i, &p) in probs.iter().enumerate().take(Category::ALL.len()) {
            if p > best_prob {
                best_index = i;
                best_prob = p;
            }
        }

        Ok(Prediction {
            category: Category::ALL[best_index],
            confidence: best_prob,
        })
    }
}

/// Resize to the fixed square input resolution and normalize into a
/// `(1, 3, 224, 224)` CHW tensor.
pub fn preprocess(img: &image::DynamicImage, device: &Device) -> Result<Tensor, AppError> {
    let rgb = img.to_rgb8();
    let resized = image::imageops::resize(
        &rgb,
        IMAGE_SIZE as u32,
        IMAGE_SIZE as u32,
        FilterType::Triangle,
    );
    let tensor = Tensor::from_vec(
        normalize(resized.as_raw()),
        (1, 3, IMAGE_SIZE, IMAGE_SIZE),
        device,
    )?;
    Ok(tensor)
}

/// Interleaved RGB bytes to planar CHW floats, scaled to [0,1] then
/// normalized per channel.
fn normalize(rgb: &[u8]) -> Vec<f32> {
    let mut data = vec![0f32; 3 * IMAGE_SIZE * IMAGE_SIZE];
    for i in 0..(IMAGE_SIZE * IMAGE_SIZE) {
        let r = rgb[i * 3] as f32 / 255.0;
        let g = rgb[i * 3 + 1] as f32 / 255.0;
        let b = rgb[i * 3 + 2] as f32 / 255.0;

        data[i] = (r - MEAN[0]) / STD[0];
        data[IMAGE_SIZE * IMAGE_SIZE + i] = (g - MEAN[1]) / STD[1];
        data[2 * IMAGE_SIZE * IMAGE_SIZE + i] = (b - MEAN[2]) / STD[2];
    }
    data
}
