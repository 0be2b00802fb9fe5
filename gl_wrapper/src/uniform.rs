use gl::types::{GLint, GLsizei};

use linalg::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

/// Values that can be written to a uniform location of the program in use.
pub trait UniformValue {
    fn upload(&self, location: GLint);
}

impl UniformValue for i32 {
    fn upload(&self, location: GLint) {
        unsafe { gl::Uniform1i(location, *self) }
    }
}

impl UniformValue for f32 {
    fn upload(&self, location: GLint) {
        unsafe { gl::Uniform1f(location, *self) }
    }
}

impl UniformValue for bool {
    fn upload(&self, location: GLint) {
        unsafe { gl::Uniform1i(location, *self as GLint) }
    }
}

macro_rules! impl_vector_uniform {
    ($ty:ty, $call:ident) => {
        impl UniformValue for $ty {
            fn upload(&self, location: GLint) {
                std::slice::from_ref(self).upload(location)
            }
        }

        impl UniformValue for [$ty] {
            fn upload(&self, location: GLint) {
                if self.is_empty() {
                    return;
                }

                let floats: &[f32] = bytemuck::cast_slice(self);

                unsafe { gl::$call(location, self.len() as GLsizei, floats.as_ptr()) }
            }
        }
    };
}

impl_vector_uniform!(Vec2, Uniform2fv);
impl_vector_uniform!(Vec3, Uniform3fv);
impl_vector_uniform!(Vec4, Uniform4fv);

// Matrices are stored by rows, so GL is told to transpose them.
macro_rules! impl_matrix_uniform {
    ($ty:ty, $call:ident) => {
        impl UniformValue for $ty {
            fn upload(&self, location: GLint) {
                std::slice::from_ref(self).upload(location)
            }
        }

        impl UniformValue for [$ty] {
            fn upload(&self, location: GLint) {
                if self.is_empty() {
                    return;
                }

                let floats: &[f32] = bytemuck::cast_slice(self);

                unsafe { gl::$call(location, self.len() as GLsizei, gl::TRUE, floats.as_ptr()) }
            }
        }
    };
}

impl_matrix_uniform!(Mat2, UniformMatrix2fv);
impl_matrix_uniform!(Mat3, UniformMatrix3fv);
impl_matrix_uniform!(Mat4, UniformMatrix4fv);

impl UniformValue for [f32] {
    fn upload(&self, location: GLint) {
        if !self.is_empty() {
            unsafe { gl::Uniform1fv(location, self.len() as GLsizei, self.as_ptr()) }
        }
    }
}

impl UniformValue for [i32] {
    fn upload(&self, location: GLint) {
        if !self.is_empty() {
            unsafe { gl::Uniform1iv(location, self.len() as GLsizei, self.as_ptr()) }
        }
    }
}

impl<T, const N: usize> UniformValue for [T; N]
where
    [T]: UniformValue,
{
    fn upload(&self, location: GLint) {
        self[..].upload(location)
    }
}

impl<T: UniformValue + ?Sized> UniformValue for &T {
    fn upload(&self, location: GLint) {
        (*self).upload(location)
    }
}

impl<T> UniformValue for Vec<T>
where
    [T]: UniformValue,
{
    fn upload(&self, location: GLint) {
        self.as_slice().upload(location)
    }
}
