//! Rendered page images and the ordered sequence the pipeline passes around.

use image::DynamicImage;

/// One rasterised PDF page.
#[derive(Debug, Clone)]
pub struct PageImage {
    index: usize,
    image: DynamicImage,
}

impl PageImage {
    /// 0-based position of the page in the source document.
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based page number, as shown to users and used in archive entry names.
    pub fn page_num(&self) -> usize {
        self.index + 1
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}

/// Pages of one document in source order.
///
/// Indices are assigned on [`push`](Self::push), so they are always
/// `0..len` and contiguous; there is no way to reorder or drop a page.
#[derive(Debug, Clone, Default)]
pub struct PageSequence {
    pages: Vec<PageImage>,
}

impl PageSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            pages: Vec::with_capacity(n),
        }
    }

    /// Append the next page and return its 0-based index.
    pub fn push(&mut self, image: DynamicImage) -> usize {
        let index = self.pages.len();
        self.pages.push(PageImage { index, image });
        index
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PageImage> {
        self.pages.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageImage> {
        self.pages.iter()
    }
}

impl FromIterator<DynamicImage> for PageSequence {
    fn from_iter<I: IntoIterator<Item = DynamicImage>>(iter: I) -> Self {
        let mut seq = Self::new();
        for image in iter {
            seq.push(image);
        }
        seq
    }
}

impl<'a> IntoIterator for &'a PageSequence {
    type Item = &'a PageImage;
    type IntoIter = std::slice::Iter<'a, PageImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

impl IntoIterator for PageSequence {
    type Item = PageImage;
    type IntoIter = std::vec::IntoIter<PageImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.into_iter()
    }
}
