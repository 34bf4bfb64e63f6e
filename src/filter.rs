//! Per-scanline prediction filters.
//!
//! Only the four cheap predictors are tried. Paeth (type 4) is never produced.

use crate::Error;
use log::trace;

/// Filter type byte that precedes every scanline
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FilterType {
    /// Row stored as-is
    None = 0,
    /// Difference from the byte one pixel to the left
    Sub = 1,
    /// Difference from the byte above
    Up = 2,
    /// Difference from the rounded-down mean of left and above
    Average = 3,
}

impl FilterType {
    /// Candidates in the order they're tried. On equal cost the earlier one wins.
    pub const ALL: [FilterType; 4] = [FilterType::None, FilterType::Sub, FilterType::Up, FilterType::Average];
}

impl From<FilterType> for u8 {
    #[inline]
    fn from(f: FilterType) -> u8 {
        f as u8
    }
}

/// How truecolor rows pick their filter
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum FilterStrategy {
    /// Every row uses filter type 0
    Zero,
    /// Every row tries types 0-3 and keeps the one with the smallest sum of output bytes
    #[default]
    MinSum,
}

/// Apply one filter. `prevline` of `None` means the row above is all zeros.
///
/// `out` and `scanline` must be the same length, and `prevline` too if given.
pub fn filter_scanline(out: &mut [u8], scanline: &[u8], prevline: Option<&[u8]>, bytewidth: usize, filter_type: FilterType) {
    let length = scanline.len();
    debug_assert_eq!(out.len(), length);
    let bytewidth = bytewidth.min(length);

    match filter_type {
        FilterType::None => {
            out.copy_from_slice(scanline);
        },
        FilterType::Sub => {
            out[..bytewidth].copy_from_slice(&scanline[..bytewidth]);
            for i in bytewidth..length {
                out[i] = scanline[i].wrapping_sub(scanline[i - bytewidth]);
            }
        },
        FilterType::Up => if let Some(prevline) = prevline {
            for i in 0..length {
                out[i] = scanline[i].wrapping_sub(prevline[i]);
            }
        } else {
            out.copy_from_slice(scanline);
        },
        FilterType::Average => if let Some(prevline) = prevline {
            for i in 0..bytewidth {
                out[i] = scanline[i].wrapping_sub(prevline[i] >> 1);
            }
            for i in bytewidth..length {
                let avg = (u16::from(scanline[i - bytewidth]) + u16::from(prevline[i])) >> 1;
                out[i] = scanline[i].wrapping_sub(avg as u8);
            }
        } else {
            out[..bytewidth].copy_from_slice(&scanline[..bytewidth]);
            for i in bytewidth..length {
                out[i] = scanline[i].wrapping_sub(scanline[i - bytewidth] >> 1);
            }
        },
    }
}

#[inline]
fn cost(filtered: &[u8]) -> usize {
    filtered.iter().map(|&b| b as usize).sum()
}

/// Try every filter into `attempt` and return the cheapest one's type
fn choose_filter(attempt: &mut [Vec<u8>; 4], scanline: &[u8], prevline: Option<&[u8]>, bytewidth: usize) -> FilterType {
    let mut best_type = FilterType::None;
    let mut smallest = usize::MAX;
    for (type_, out) in FilterType::ALL.into_iter().zip(attempt.iter_mut()) {
        filter_scanline(out, scanline, prevline, bytewidth, type_);
        let sum = cost(out);
        // strictly smaller, so ties keep the lower type
        if sum < smallest {
            best_type = type_;
            smallest = sum;
        }
    }
    best_type
}

/// Pick the filter with the lowest sum of output bytes and return it with the filtered row
#[must_use]
pub fn filter_row(row: &[u8], previous_row: Option<&[u8]>, bytes_per_pixel: usize) -> (FilterType, Vec<u8>) {
    let mut attempt = [vec![0u8; row.len()], vec![0u8; row.len()], vec![0u8; row.len()], vec![0u8; row.len()]];
    let best = choose_filter(&mut attempt, row, previous_row, bytes_per_pixel);
    let [a0, a1, a2, a3] = attempt;
    let filtered = match best {
        FilterType::None => a0,
        FilterType::Sub => a1,
        FilterType::Up => a2,
        FilterType::Average => a3,
    };
    (best, filtered)
}

/// Filter `h` rows of `linebytes` each from `inp`, appending `type | filtered row` per row to `out`.
///
/// Rows are compared against the previous *unfiltered* row.
pub(crate) fn filter(out: &mut Vec<u8>, inp: &[u8], linebytes: usize, h: usize, bytewidth: usize, strategy: FilterStrategy) -> Result<(), Error> {
    out.try_reserve((linebytes + 1) * h)?;
    if linebytes == 0 {
        // rows of zero width are just the filter byte
        out.resize(out.len() + h, 0);
        return Ok(());
    }
    let mut prevline = None;
    let mut attempt = [vec![0u8; linebytes], vec![0u8; linebytes], vec![0u8; linebytes], vec![0u8; linebytes]];
    for (y, scanline) in inp.chunks_exact(linebytes).take(h).enumerate() {
        let type_ = match strategy {
            FilterStrategy::Zero => FilterType::None,
            FilterStrategy::MinSum => choose_filter(&mut attempt, scanline, prevline, bytewidth),
        };
        trace!("row {}: filter {:?}", y, type_);
        out.push(type_.into());
        match strategy {
            FilterStrategy::Zero => out.extend_from_slice(scanline),
            FilterStrategy::MinSum => out.extend_from_slice(&attempt[type_ as usize]),
        }
        prevline = Some(scanline);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unfilter_scanline(recon: &mut [u8], scanline: &[u8], precon: Option<&[u8]>, bytewidth: usize, filter_type: u8) {
        let up = |i: usize| precon.map_or(0, |p| p[i]);
        for i in 0..scanline.len() {
            let left = if i >= bytewidth { recon[i - bytewidth] } else { 0 };
            let pred = match filter_type {
                0 => 0,
                1 => left,
                2 => up(i),
                3 => ((u16::from(left) + u16::from(up(i))) >> 1) as u8,
                _ => panic!("filter {}", filter_type),
            };
            recon[i] = scanline[i].wrapping_add(pred);
        }
    }

    #[test]
    fn test_filter() {
        let mut line1 = Vec::with_capacity(1 << 16);
        let mut line2 = Vec::with_capacity(1 << 16);
        for p in 0..256 {
            for q in 0..256 {
                line1.push(q as u8);
                line2.push(p as u8);
            }
        }

        let mut filtered = vec![99u8; 1 << 16];
        let mut unfiltered = vec![66u8; 1 << 16];
        for bytewidth in [1, 3, 4] {
            for filter_type in FilterType::ALL {
                filter_scanline(&mut filtered, &line1, Some(&line2), bytewidth, filter_type);
                unfilter_scanline(&mut unfiltered, &filtered, Some(&line2), bytewidth, filter_type.into());
                assert_eq!(unfiltered, line1, "prev+filter={:?}", filter_type);
            }
            for filter_type in FilterType::ALL {
                filter_scanline(&mut filtered, &line1, None, bytewidth, filter_type);
                unfilter_scanline(&mut unfiltered, &filtered, None, bytewidth, filter_type.into());
                assert_eq!(unfiltered, line1, "none+filter={:?}", filter_type);
            }
        }
    }

    #[test]
    fn wraps_instead_of_saturating() {
        let row = [0u8, 0, 0, 5, 5, 5];
        let prev = [200u8, 200, 200, 255, 255, 255];
        let mut out = [0u8; 6];
        filter_scanline(&mut out, &row, Some(&prev), 3, FilterType::Up);
        assert_eq!(out, [56, 56, 56, 6, 6, 6]);
        filter_scanline(&mut out, &row, Some(&prev), 3, FilterType::Sub);
        assert_eq!(out, [0, 0, 0, 5, 5, 5]);
        // (0 + 255) / 2 = 127
        filter_scanline(&mut out, &row, Some(&prev), 3, FilterType::Average);
        assert_eq!(out, [156, 156, 156, 134, 134, 134]);
    }

    #[test]
    fn single_flat_pixel_prefers_none() {
        let row = [10, 10, 10, 255];
        let (type_, data) = filter_row(&row, None, 4);
        assert_eq!(FilterType::None, type_);
        assert_eq!(data, row);

        let (type_, data) = filter_row(&row, Some(&row), 4);
        assert_eq!(FilterType::Up, type_);
        assert_eq!(data, [0, 0, 0, 0]);
    }

    #[test]
    fn ties_go_to_lower_type() {
        // Sub [4,0], Up [0,4] and Average [2,2] all sum to 4
        let prev = [4u8, 0];
        let row = [4u8, 4];
        let mut out = [0u8; 2];
        filter_scanline(&mut out, &row, Some(&prev), 1, FilterType::Average);
        assert_eq!(out, [2, 2]);
        assert_eq!((FilterType::Sub, vec![4, 0]), filter_row(&row, Some(&prev), 1));

        let zeros = [0u8; 9];
        assert_eq!((FilterType::None, zeros.to_vec()), filter_row(&zeros, Some(&[0; 9]), 3));
    }

    #[test]
    fn gradient_picks_sub() {
        let row: Vec<u8> = (0..30).map(|i| i * 3).collect();
        let (type_, data) = filter_row(&row, None, 3);
        assert_eq!(FilterType::Sub, type_);
        assert!(data[3..].iter().all(|&b| b == 9));
    }

    #[test]
    fn never_paeth() {
        let mut seed = 1u32;
        let mut prev = vec![0u8; 48];
        for _ in 0..200 {
            let row: Vec<u8> = (0..48).map(|_| {
                seed = 1103515245u32.wrapping_mul(seed).wrapping_add(12345);
                (seed >> 16) as u8
            }).collect();
            let (type_, data) = filter_row(&row, Some(&prev), 3);
            assert!((type_ as u8) < 4);
            assert_eq!((type_, data.clone()), filter_row(&row, Some(&prev), 3));
            let mut recon = vec![0; 48];
            unfilter_scanline(&mut recon, &data, Some(&prev), 3, type_.into());
            assert_eq!(recon, row);
            prev = row;
        }
    }

    #[test]
    fn whole_image() {
        let w = 5;
        let h = 4;
        let data: Vec<u8> = (0..w * h * 4).map(|i| (i * 7 % 251) as u8).collect();
        let mut out = Vec::new();
        filter(&mut out, &data, w * 4, h, 4, FilterStrategy::MinSum).unwrap();
        assert_eq!(out.len(), (w * 4 + 1) * h);

        let mut prev: Option<&[u8]> = None;
        for (y, line) in out.chunks(w * 4 + 1).enumerate() {
            let row = &data[y * w * 4..(y + 1) * w * 4];
            let (type_, filtered) = filter_row(row, prev, 4);
            assert_eq!(line[0], type_ as u8);
            assert_eq!(&line[1..], &filtered[..]);
            prev = Some(row);
        }

        let mut zero = Vec::new();
        filter(&mut zero, &data, w * 4, h, 4, FilterStrategy::Zero).unwrap();
        for (y, line) in zero.chunks(w * 4 + 1).enumerate() {
            assert_eq!(0, line[0]);
            assert_eq!(&line[1..], &data[y * w * 4..(y + 1) * w * 4]);
        }
    }

    #[test]
    fn zero_width_rows() {
        let mut out = Vec::new();
        filter(&mut out, &[], 0, 3, 3, FilterStrategy::MinSum).unwrap();
        assert_eq!(out, [0, 0, 0]);
    }
}
