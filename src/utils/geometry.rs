// src/utils/geometry.rs

type Point3 = [f64; 3];

/// Angle B1-A-B2 in degrees, with A as the vertex.
pub fn calculate_angle(p1: Point3, center: Point3, p3: Point3) -> f64 {
    let v1 = normalize(sub(p1, center));
    let v2 = normalize(sub(p3, center));
    dot(v1, v2).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Torsion angle P1-P2-P3-P4 in degrees, in (-180, 180].
pub fn calculate_dihedral(p1: Point3, p2: Point3, p3: Point3, p4: Point3) -> f64 {
    let b1 = sub(p2, p1);
    let b2 = sub(p3, p2);
    let b3 = sub(p4, p3);

    let v = cross(b1, b2);
    let w = cross(b2, b3);

    let x = dot(v, w);
    let y = dot(normalize(b2), cross(v, w));
    y.atan2(x).to_degrees()
}

/// Rotates `p` about the x axis by `rot_x`, then about the y axis by `rot_y` (radians).
pub fn rotate_xy(p: Point3, rot_x: f64, rot_y: f64) -> Point3 {
    let (sx, cx) = rot_x.sin_cos();
    let (sy, cy) = rot_y.sin_cos();

    let y1 = p[1] * cx - p[2] * sx;
    let z1 = p[1] * sx + p[2] * cx;

    let x2 = p[0] * cy + z1 * sy;
    let z2 = -p[0] * sy + z1 * cy;
    [x2, y1, z2]
}

pub fn midpoint(a: Point3, b: Point3) -> Point3 {
    [(a[0] + b[0]) * 0.5, (a[1] + b[1]) * 0.5, (a[2] + b[2]) * 0.5]
}

fn sub(a: Point3, b: Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: Point3, b: Point3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Point3, b: Point3) -> Point3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(a: Point3) -> Point3 {
    let l = dot(a, a).sqrt();
    if l == 0.0 { [0.0, 0.0, 0.0] } else { [a[0] / l, a[1] / l, a[2] / l] }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_angle() {
        let a = calculate_angle([1.0, 0.0, 0.0], [0.0; 3], [0.0, 2.0, 0.0]);
        assert!((a - 90.0).abs() < 1e-12);
    }

    #[test]
    fn dihedral_signs() {
        let p1 = [1.0, 0.0, 0.0];
        let p2 = [0.0, 0.0, 0.0];
        let p3 = [0.0, 0.0, 1.0];
        assert!((calculate_dihedral(p1, p2, p3, [1.0, 0.0, 1.0])).abs() < 1e-12);
        assert!((calculate_dihedral(p1, p2, p3, [0.0, 1.0, 1.0]) - 90.0).abs() < 1e-12);
        assert!((calculate_dihedral(p1, p2, p3, [0.0, -1.0, 1.0]) + 90.0).abs() < 1e-12);
    }

    #[test]
    fn rotation_preserves_length() {
        let p = [1.0, -2.0, 0.5];
        let q = rotate_xy(p, 0.7, -1.3);
        assert!((dot(p, p) - dot(q, q)).abs() < 1e-12);
        assert_eq!(rotate_xy(p, 0.0, 0.0), p);
    }
}
