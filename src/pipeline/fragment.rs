use super::primitives::Fragment;

/// Fragment shader, applied to every fragment after rasterization and before the depth test.
pub trait FragmentShader: Send + Sync {
    fn shade(&self, fragment: Fragment) -> Fragment;
}

/// Passes fragments through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl FragmentShader for Identity {
    fn shade(&self, fragment: Fragment) -> Fragment {
        return fragment;
    }
}

impl<F> FragmentShader for F
where
    F: Fn(Fragment) -> Fragment + Send + Sync,
{
    fn shade(&self, fragment: Fragment) -> Fragment {
        return self(fragment);
    }
}
