//! Logical table layout.
//!
//! A table of logical values l[0..N) is stored as P = sum_j l[j] X^-j, so
//! physical coefficient 0 holds l[0] and coefficient N-j holds -l[j]. Under
//! this layout P * X^a carries l[a] to coefficient 0.

use math::poly::{Coeff, Eval, Poly};
use math::ring::Ring;

use crate::error::VmError;

/// Lays out values (reduced mod q) in coefficient form. Unused slots are 0.
pub fn pack_into(ring: &Ring<u64>, values: &[u64], out: &mut Poly<Coeff>) -> Result<(), VmError> {
    let n: usize = ring.n();
    if values.len() > n {
        return Err(VmError::TooManyValues {
            len: values.len(),
            n,
        });
    }
    let q: u64 = ring.q();
    out.zero();
    let coeffs: &mut [u64] = out.coeffs_mut();
    for (j, v) in values.iter().enumerate() {
        let v: u64 = v % q;
        if j == 0 {
            coeffs[0] = v;
        } else {
            coeffs[n - j] = ring.scalar_neg(v);
        }
    }
    Ok(())
}

/// Returns the evaluation-domain table holding values.
pub fn pack(ring: &Ring<u64>, values: &[u64]) -> Result<Poly<Eval>, VmError> {
    let mut coeff: Poly<Coeff> = ring.new_poly();
    pack_into(ring, values, &mut coeff)?;
    Ok(ring.ntt_inplace(coeff))
}

/// Returns the N logical values of a table.
pub fn unpack(ring: &Ring<u64>, table: &Poly<Eval>) -> Vec<u64> {
    let n: usize = ring.n();
    let mut coeff: Poly<Coeff> = ring.new_poly();
    ring.intt(table, &mut coeff);
    let coeffs: &[u64] = coeff.coeffs();
    (0..n)
        .map(|j| {
            if j == 0 {
                coeffs[0]
            } else {
                ring.scalar_neg(coeffs[n - j])
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let ring: Ring<u64> = Ring::<u64>::new(4, 17).unwrap();
        let mut coeff: Poly<Coeff> = ring.new_poly();
        pack_into(&ring, &[5, 1, 2], &mut coeff).unwrap();
        assert_eq!(coeff.coeffs(), &[5, 0, 15, 16]);
    }

    #[test]
    fn unpack_inverts_pack() {
        let ring: Ring<u64> = Ring::<u64>::new(8, 17).unwrap();
        let table: Poly<Eval> = pack(&ring, &[1, 2, 3, 20]).unwrap();
        assert_eq!(unpack(&ring, &table), vec![1, 2, 3, 3, 0, 0, 0, 0]);
    }

    #[test]
    fn rejects_too_many_values() {
        let ring: Ring<u64> = Ring::<u64>::new(4, 17).unwrap();
        assert!(matches!(
            pack(&ring, &[0; 5]),
            Err(VmError::TooManyValues { len: 5, n: 4 })
        ));
    }
}
