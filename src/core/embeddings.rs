//! Image embedding extraction using a pre-trained vision model.
//!
//! The [`ImageEmbedder`] and [`TextEmbedder`] traits are the seam between the
//! request-handling core and the pretrained models, so handlers can be tested
//! against deterministic stand-ins without loading any weights.

use std::path::Path;

use ndarray::Array1;

use crate::error::Result;

/// Output dimension of the vision embedder (ResNet-50, average-pooled)
pub const IMAGE_EMBEDDING_DIM: usize = 2048;
/// Output dimension of the text embedder (BERT base, CLS token)
pub const TEXT_EMBEDDING_DIM: usize = 768;

/// Produces a fixed-length embedding for an image on disk
pub trait ImageEmbedder: Send + Sync {
    /// Compute an embedding for the image at `path`
    ///
    /// Fails when the path does not resolve to a readable image.
    fn embed_image(&self, path: &Path) -> Result<Array1<f32>>;

    /// Length of the vectors this embedder produces
    fn dim(&self) -> usize {
        IMAGE_EMBEDDING_DIM
    }
}

/// Produces a fixed-length embedding for a piece of text
pub trait TextEmbedder: Send + Sync {
    /// Compute an embedding for `text`, truncating beyond the token budget
    fn embed_text(&self, text: &str) -> Result<Array1<f32>>;

    /// Length of the vectors this embedder produces
    fn dim(&self) -> usize {
        TEXT_EMBEDDING_DIM
    }
}

#[cfg(feature = "embeddings")]
pub use model::ResNetEmbedder;

#[cfg(feature = "embeddings")]
mod model {
    use std::path::Path;
    use std::sync::Mutex;

    use anyhow::Context;
    use image::DynamicImage;
    use ndarray::Array1;
    use tch::{nn, nn::ModuleT, Device, Kind, Tensor};

    use super::{ImageEmbedder, IMAGE_EMBEDDING_DIM};
    use crate::error::{AppError, Result};

    /// ResNet-50 image embedder backed by libtorch
    ///
    /// Uses the network without its classification head, so the output is the
    /// 2048-dim global-average-pooled feature vector.
    pub struct ResNetEmbedder {
        // FuncT is not Sync, so inference is serialized behind a mutex
        net: Mutex<Box<dyn ModuleT + Send>>,
        #[allow(dead_code)]
        vs: nn::VarStore,
        device: Device,
    }

    impl std::fmt::Debug for ResNetEmbedder {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("ResNetEmbedder")
                .field("device", &self.device)
                .finish()
        }
    }

    impl ResNetEmbedder {
        /// Load ResNet-50 weights from `weights_path` (a `.ot` file)
        pub fn load<P: AsRef<Path>>(weights_path: P) -> Result<Self> {
            let device = Device::cuda_if_available();
            let mut vs = nn::VarStore::new(device);
            let net = tch::vision::resnet::resnet50_no_final_layer(&vs.root());

            vs.load(weights_path.as_ref()).map_err(|e| {
                AppError::ModelLoad(format!(
                    "failed to load ResNet-50 weights from {}: {}",
                    weights_path.as_ref().display(),
                    e
                ))
            })?;
            vs.freeze();

            log::info!(
                "Loaded ResNet-50 weights from {} on {:?}",
                weights_path.as_ref().display(),
                device
            );

            Ok(Self {
                net: Mutex::new(Box::new(net)),
                vs,
                device,
            })
        }

        /// Preprocess an image for the model
        fn preprocess_image(&self, img: &DynamicImage) -> Result<Tensor> {
            // Resize to 224x224 (standard size for ResNet)
            let img = img.resize_exact(224, 224, image::imageops::FilterType::Triangle);

            let rgb_img = img.to_rgb8();
            let (width, height) = rgb_img.dimensions();

            // Flat vector of f32 values in [0, 1], channel-last
            let mut data = Vec::with_capacity((width * height * 3) as usize);
            for y in 0..height {
                for x in 0..width {
                    let pixel = rgb_img.get_pixel(x, y);
                    data.push(pixel[0] as f32 / 255.0); // R
                    data.push(pixel[1] as f32 / 255.0); // G
                    data.push(pixel[2] as f32 / 255.0); // B
                }
            }

            // [H, W, C] -> [C, H, W]
            let tensor = Tensor::of_slice(&data)
                .reshape(&[224, 224, 3])
                .permute(&[2, 0, 1])
                .to_kind(Kind::Float);

            // ImageNet channel statistics
            let mean = Tensor::of_slice(&[0.485_f32, 0.456, 0.406])
                .view([3, 1, 1])
                .to_kind(Kind::Float);
            let std = Tensor::of_slice(&[0.229_f32, 0.224, 0.225])
                .view([3, 1, 1])
                .to_kind(Kind::Float);

            let normalized = (tensor - &mean) / &std;

            // Add batch dimension [1, 3, 224, 224]
            Ok(normalized.unsqueeze(0))
        }
    }

    impl ImageEmbedder for ResNetEmbedder {
        fn embed_image(&self, path: &Path) -> Result<Array1<f32>> {
            let img = image::open(path)
                .with_context(|| format!("failed to read image {}", path.display()))?;

            let input = self.preprocess_image(&img)?.to_device(self.device);

            let net = self
                .net
                .lock()
                .map_err(|_| AppError::Internal("vision model lock poisoned".to_string()))?;
            let output = tch::no_grad(|| net.forward_t(&input, false));

            let embedding = Vec::<f32>::try_from(output.squeeze().to_device(Device::Cpu))?;
            debug_assert_eq!(embedding.len(), IMAGE_EMBEDDING_DIM);

            Ok(Array1::from(embedding))
        }
    }
}
