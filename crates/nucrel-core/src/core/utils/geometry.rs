use nalgebra::{Isometry3, Matrix3, Point3, Rotation3, Translation3, Unit, UnitQuaternion, Vector3};

pub fn rotation_from_axis_angle(axis: &Vector3<f64>, angle_degrees: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle_degrees.to_radians())
}

#[inline]
pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (b - a).norm()
}

/// Angle at `vertex` between the rays toward `a` and `c`, in radians.
///
/// Returns NaN when either ray has zero length; callers that feed the result
/// into a score treat NaN as "no interaction".
pub fn angle(a: &Point3<f64>, vertex: &Point3<f64>, c: &Point3<f64>) -> f64 {
    cos_angle(a, vertex, c).clamp(-1.0, 1.0).acos()
}

pub fn cos_angle(a: &Point3<f64>, vertex: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let u = a - vertex;
    let v = c - vertex;
    u.dot(&v) / (u.norm() * v.norm())
}

/// Signed dihedral angle p1-p2-p3-p4 in radians, in (-pi, pi].
pub fn torsion(p1: &Point3<f64>, p2: &Point3<f64>, p3: &Point3<f64>, p4: &Point3<f64>) -> f64 {
    let b1 = p2 - p1;
    let b2 = p3 - p2;
    let b3 = p4 - p3;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);

    (b2.norm() * b1.dot(&n2)).atan2(n1.dot(&n2))
}

pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Point3<f64>> {
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for point in points {
        sum += point.coords;
        count += 1;
    }
    (count > 0).then(|| Point3::from(sum / count as f64))
}

/// Right-handed frame with its origin at `origin`, x axis toward `x_point`
/// and z axis along `x × (plane_point - origin)`.
///
/// Returns `None` if the three points are (nearly) collinear.
pub fn frame_from_points(
    origin: &Point3<f64>,
    x_point: &Point3<f64>,
    plane_point: &Point3<f64>,
) -> Option<Isometry3<f64>> {
    let x = (x_point - origin).try_normalize(1e-9)?;
    let z = x.cross(&(plane_point - origin)).try_normalize(1e-9)?;
    let y = z.cross(&x);

    let rotation = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[x, y, z]));
    Some(Isometry3::from_parts(
        Translation3::from(origin.coords),
        UnitQuaternion::from_rotation_matrix(&rotation),
    ))
}

/// Substituent on an sp2 ring atom, pointing away from both ring neighbours.
pub fn bisector_substituent(
    center: &Point3<f64>,
    neighbor_a: &Point3<f64>,
    neighbor_b: &Point3<f64>,
    bond_length: f64,
) -> Option<Point3<f64>> {
    let a = (neighbor_a - center).try_normalize(1e-9)?;
    let b = (neighbor_b - center).try_normalize(1e-9)?;
    let direction = (-(a + b)).try_normalize(1e-9)?;
    Some(center + direction * bond_length)
}

/// The two in-plane substituents of a trigonal atom bonded to `neighbor`,
/// at +120 and -120 degrees about `plane_normal`.
pub fn trigonal_substituents(
    center: &Point3<f64>,
    neighbor: &Point3<f64>,
    plane_normal: &Vector3<f64>,
    bond_length: f64,
) -> Option<[Point3<f64>; 2]> {
    let axis = (neighbor - center).try_normalize(1e-9)?;
    plane_normal.try_normalize(1e-9)?;
    let first = rotation_from_axis_angle(plane_normal, 120.0) * axis;
    let second = rotation_from_axis_angle(plane_normal, -120.0) * axis;
    Some([center + first * bond_length, center + second * bond_length])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-9;

    #[test]
    fn angle_of_right_angle_is_half_pi() {
        let a = Point3::new(1.0, 0.0, 0.0);
        let v = Point3::origin();
        let c = Point3::new(0.0, 2.0, 0.0);
        assert!((angle(&a, &v, &c) - PI / 2.0).abs() < EPS);
    }

    #[test]
    fn angle_with_degenerate_ray_is_nan() {
        let v = Point3::origin();
        assert!(cos_angle(&v, &v, &Point3::new(1.0, 0.0, 0.0)).is_nan());
    }

    #[test]
    fn torsion_distinguishes_cis_and_trans() {
        let p1 = Point3::new(1.0, 1.0, 0.0);
        let p2 = Point3::new(0.0, 0.0, 0.0);
        let p3 = Point3::new(0.0, 0.0, 1.0);
        let cis = Point3::new(1.0, 1.0, 1.0);
        let trans = Point3::new(-1.0, -1.0, 1.0);
        assert!(torsion(&p1, &p2, &p3, &cis).abs() < EPS);
        assert!((torsion(&p1, &p2, &p3, &trans).abs() - PI).abs() < EPS);
    }

    #[test]
    fn torsion_sign_follows_rotation_sense() {
        let p1 = Point3::new(1.0, 0.0, 0.0);
        let p2 = Point3::new(0.0, 0.0, 0.0);
        let p3 = Point3::new(0.0, 0.0, 1.0);
        let p4 = Point3::new(0.0, 1.0, 1.0);
        assert!((torsion(&p1, &p2, &p3, &p4) - PI / 2.0).abs() < EPS);
    }

    #[test]
    fn centroid_of_empty_set_is_none() {
        assert!(centroid(std::iter::empty()).is_none());
        let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, -6.0)];
        assert_eq!(centroid(&points), Some(Point3::new(1.0, 2.0, -3.0)));
    }

    #[test]
    fn frame_from_points_is_orthonormal_and_right_handed() {
        let origin = Point3::new(1.0, 2.0, 3.0);
        let frame = frame_from_points(
            &origin,
            &Point3::new(3.0, 2.0, 3.0),
            &Point3::new(1.0, 5.0, 3.0),
        )
        .unwrap();

        assert!((frame * Point3::origin() - origin).norm() < EPS);
        let x = frame * Vector3::x();
        let y = frame * Vector3::y();
        let z = frame * Vector3::z();
        assert!((x - Vector3::x()).norm() < EPS);
        assert!((y - Vector3::y()).norm() < EPS);
        assert!((z - Vector3::z()).norm() < EPS);
    }

    #[test]
    fn frame_from_collinear_points_is_none() {
        let origin = Point3::origin();
        assert!(
            frame_from_points(&origin, &Point3::new(1.0, 0.0, 0.0), &Point3::new(2.0, 0.0, 0.0))
                .is_none()
        );
    }

    #[test]
    fn bisector_substituent_points_away_from_neighbors() {
        let center = Point3::origin();
        let h = bisector_substituent(
            &center,
            &Point3::new(-1.0, 1.0, 0.0),
            &Point3::new(1.0, 1.0, 0.0),
            1.08,
        )
        .unwrap();
        assert!((h - Point3::new(0.0, -1.08, 0.0)).norm() < EPS);
    }

    #[test]
    fn trigonal_substituents_are_at_120_degrees_from_the_bond() {
        let center = Point3::origin();
        let neighbor = Point3::new(1.3, 0.0, 0.0);
        let [a, b] = trigonal_substituents(&center, &neighbor, &Vector3::z(), 1.0).unwrap();

        for p in [a, b] {
            assert!((distance(&center, &p) - 1.0).abs() < EPS);
            assert!((angle(&neighbor, &center, &p).to_degrees() - 120.0).abs() < 1e-6);
            assert!(p.z.abs() < EPS);
        }
        assert!(a.y > 0.0 && b.y < 0.0);
    }
}
